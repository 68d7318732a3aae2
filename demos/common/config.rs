use dotenv::dotenv;
use envconfig::Envconfig;
use ethers::prelude::{Http, LocalWallet, Provider, Signer};
use eyre::Result;
use flashbot_rs::{FlashbotClient, Network};
use tokio::sync::OnceCell;
use tracing::*;

/// Demo settings, read once from the environment (or `.env`).
pub struct Config {
    /// Key the relay knows us by; builds reputation across runs.
    pub auth_wallet: LocalWallet,
    /// Key that signs the bundled transactions.
    pub sender_wallet: LocalWallet,
    /// Sepolia node used for nonces, fees and the current block.
    pub provider: Provider<Http>,
    pub relay_url: Option<String>,
}

impl Config {
    pub async fn from_env() -> Result<&'static Config> {
        CONFIG.get_or_try_init(Config::load).await
    }

    /// A Sepolia relay client signing with the auth key and asking gas prices to the node.
    pub fn client(&self) -> FlashbotClient {
        let client = FlashbotClient::new(Network::Sepolia)
            .with_auth_wallet(self.auth_wallet.clone())
            .with_chain_node(self.provider.clone());

        match &self.relay_url {
            Some(relay_url) => client.with_relay_url(relay_url.as_str()),
            None => client,
        }
    }

    async fn load() -> Result<Config> {
        dotenv()?;
        let env = Env::init_from_env()?;

        let config = Config {
            auth_wallet: LocalWallet::from_bytes(&env.auth_private_key)?,
            sender_wallet: LocalWallet::from_bytes(&env.sender_private_key)?,
            provider: Provider::<Http>::try_from(env.provider_url.as_str())?,
            relay_url: env.relay_url,
        };

        debug!(
            searcher = ?config.auth_wallet.address(),
            sender = ?config.sender_wallet.address(),
            node = env.provider_url,
            relay = config.relay_url.as_deref().unwrap_or("default"),
            "demo config loaded"
        );

        Ok(config)
    }
}

static CONFIG: OnceCell<Config> = OnceCell::const_new();

#[derive(Envconfig)]
struct Env {
    #[envconfig(from = "AUTH_PRIVATE_KEY")]
    auth_private_key: ethers::types::Bytes,
    #[envconfig(from = "SENDER_PRIVATE_KEY")]
    sender_private_key: ethers::types::Bytes,
    #[envconfig(from = "PROVIDER_URL")]
    provider_url: String,
    #[envconfig(from = "RELAY_URL")]
    relay_url: Option<String>,
}
