//! Multibox command-line client.
//!
//! ```text
//! multibox.toml ──▶ config ──▶ MultiboxClient ──▶ JSON-RPC node
//!                                  │
//!     MULTIBOX_PRIVATE_KEY ──▶ Account (mutating commands only)
//! ```
//!
//! Every command prints its result as JSON on stdout; logs go to stderr.

use std::path::{Path, PathBuf};

use alloy::primitives::TxHash;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use multibox_client::config::validation::validate_config;
use multibox_client::config::{load_config, ClientConfig, ConfigError};
use multibox_client::multibox::{
    decode_feed_location_hash, encode_feed_location_hash, namehash, parse_address,
    parse_name_hash, predict_multibox_address,
};
use multibox_client::observability::init_logging;
use multibox_client::{Account, FeedLocationHash, MultiboxArtifact, MultiboxClient};

#[derive(Parser)]
#[command(name = "multibox")]
#[command(about = "Deploy and query Multibox request contracts", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "multibox.toml")]
    config: PathBuf,

    /// Override the RPC endpoint from the configuration file.
    #[arg(long)]
    gateway: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a new Multibox contract
    Deploy {
        /// Nonce of the deployment transaction
        #[arg(long)]
        nonce: u64,
        /// Subdomain label of the deploying account
        #[arg(long, default_value = "")]
        subdomain: String,
        /// Wait for confirmation and print the contract address
        #[arg(long)]
        wait: bool,
    },
    /// Register a request for a recipient subdomain
    NewRequest {
        /// Subdomain label of the sending account
        #[arg(long)]
        subdomain: String,
        /// Subdomain label of the recipient
        #[arg(long)]
        recipient: String,
        /// Address of the recipient's Multibox contract
        #[arg(long)]
        multibox: String,
        /// Feed-location hash; derived from sender and recipient when omitted
        #[arg(long)]
        feed_location_hash: Option<String>,
        /// Wait for confirmation
        #[arg(long)]
        wait: bool,
    },
    /// Look up the request of a subdomain
    GetRequest {
        #[arg(long)]
        subdomain: String,
        #[arg(long)]
        multibox: String,
    },
    /// Look up the request stored under a name-hash
    GetRequestRaw {
        #[arg(long)]
        name_hash: String,
        #[arg(long)]
        multibox: String,
    },
    /// List all requests on a Multibox contract
    GetRequests {
        #[arg(long)]
        multibox: String,
    },
    /// Wait for a submitted transaction to be confirmed
    Wait { tx_hash: String },
    /// Pack a sender address and a recipient name-hash
    Encode {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        name_hash: String,
    },
    /// Split a feed-location hash into address and topic
    Decode { feed_location_hash: String },
    /// Name-hash of `<label>.<domain>`
    Namehash { label: String },
    /// Address a deployment with the given nonce will create
    PredictAddress {
        #[arg(long)]
        deployer: String,
        #[arg(long)]
        nonce: u64,
    },
}

fn read_config(path: &Path) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(load_config(path)?)
    } else {
        Ok(ClientConfig::default())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = read_config(&cli.config)?;
    if let Some(gateway) = cli.gateway {
        config.eth_gateway = gateway;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    init_logging(&config.observability)?;

    if !cli.config.exists() {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    tracing::debug!(
        eth_gateway = %config.eth_gateway,
        domain = %config.ens.domain,
        gas_price_gwei = config.gas_price_gwei,
        "Configuration loaded"
    );

    let output = run(cli.command, config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(command: Commands, config: ClientConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let output = match command {
        Commands::Encode { sender, name_hash } => {
            let hash =
                encode_feed_location_hash(parse_address(&sender)?, parse_name_hash(&name_hash)?);
            json!({ "feed_location_hash": hash })
        }
        Commands::Decode { feed_location_hash } => {
            let hash: FeedLocationHash = feed_location_hash.parse()?;
            let location = decode_feed_location_hash(&hash);
            json!({ "address": location.address, "topic": location.topic_hex() })
        }
        Commands::Namehash { label } => {
            let name = format!("{}.{}", label, config.ens.domain);
            json!({ "name": name, "name_hash": namehash(&name) })
        }
        Commands::PredictAddress { deployer, nonce } => {
            let address = predict_multibox_address(parse_address(&deployer)?, nonce);
            json!({ "address": address })
        }
        Commands::Deploy {
            nonce,
            subdomain,
            wait,
        } => {
            let artifact = MultiboxArtifact::load(Path::new(&config.artifact_path))?;
            let client = MultiboxClient::connect(config)?.with_artifact(artifact);
            let account = Account::from_env(&subdomain)?;

            let tx_hash = client.deploy_multibox(&account, nonce).await?;
            let predicted = predict_multibox_address(account.address(), nonce);
            let mut output = json!({ "tx_hash": tx_hash, "predicted_address": predicted });
            if wait {
                output["confirmation"] = json!(client.wait_for_confirmation(tx_hash).await?);
            }
            output
        }
        Commands::NewRequest {
            subdomain,
            recipient,
            multibox,
            feed_location_hash,
            wait,
        } => {
            let client = MultiboxClient::connect(config)?;
            let account = Account::from_env(&subdomain)?;
            let multibox = parse_address(&multibox)?;
            let feed_location_hash = match feed_location_hash {
                Some(text) => text.parse::<FeedLocationHash>()?,
                None => client.feed_location_hash_for(&account, &recipient),
            };

            let tx_hash = client
                .new_request(&account, &recipient, multibox, feed_location_hash)
                .await?;
            let mut output =
                json!({ "tx_hash": tx_hash, "feed_location_hash": feed_location_hash });
            if wait {
                output["confirmation"] = json!(client.wait_for_confirmation(tx_hash).await?);
            }
            output
        }
        Commands::GetRequest {
            subdomain,
            multibox,
        } => {
            let client = MultiboxClient::connect(config)?;
            json!(client.get_request(&subdomain, parse_address(&multibox)?).await?)
        }
        Commands::GetRequestRaw {
            name_hash,
            multibox,
        } => {
            let client = MultiboxClient::connect(config)?;
            json!(
                client
                    .get_request_raw(parse_name_hash(&name_hash)?, parse_address(&multibox)?)
                    .await?
            )
        }
        Commands::GetRequests { multibox } => {
            let client = MultiboxClient::connect(config)?;
            json!(client.get_requests(parse_address(&multibox)?).await?)
        }
        Commands::Wait { tx_hash } => {
            let tx_hash: TxHash = tx_hash.parse()?;
            let client = MultiboxClient::connect(config)?;
            json!(client.wait_for_confirmation(tx_hash).await?)
        }
    };

    Ok(output)
}
