use ethers::types::Chain;

/// Connection details of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayNetwork {
    pub chain: Chain,
    pub relay_url: &'static str,
}

const MAINNET: RelayNetwork = RelayNetwork {
    chain: Chain::Mainnet,
    relay_url: "https://relay.flashbots.net",
};

const SEPOLIA: RelayNetwork = RelayNetwork {
    chain: Chain::Sepolia,
    relay_url: "https://relay-sepolia.flashbots.net",
};

/// Networks with a known public relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Network {
    #[default]
    Mainnet,
    Sepolia,
}

impl From<Network> for RelayNetwork {
    fn from(value: Network) -> Self {
        match value {
            Network::Mainnet => MAINNET,
            Network::Sepolia => SEPOLIA,
        }
    }
}

impl RelayNetwork {
    pub fn chain_id(&self) -> u64 {
        self.chain as u64
    }
}
