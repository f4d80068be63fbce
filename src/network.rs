//! Network - explicit chain selection threaded through every component.

use crate::core::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network { Bitcoin, Testnet, #[default] Signet, Regtest }

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self { Network::Bitcoin => "bitcoin", Network::Testnet => "testnet", Network::Signet => "signet", Network::Regtest => "regtest" }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bitcoin" | "mainnet" => Some(Network::Bitcoin),
            "testnet" => Some(Network::Testnet),
            "signet" => Some(Network::Signet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    pub fn to_bitcoin(&self) -> bitcoin::Network {
        match self { Network::Bitcoin => bitcoin::Network::Bitcoin, Network::Testnet => bitcoin::Network::Testnet, Network::Signet => bitcoin::Network::Signet, Network::Regtest => bitcoin::Network::Regtest }
    }

    /// Default data service base URL. Regtest has no public service.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Network::Bitcoin => paths::MEMPOOL_MAINNET,
            Network::Testnet => paths::MEMPOOL_TESTNET,
            Network::Signet => paths::MEMPOOL_SIGNET,
            Network::Regtest => paths::LOCAL_REGTEST,
        }
    }

    /// Explorer link for a broadcast transaction.
    pub fn explorer_tx_url(&self, txid: &str) -> String {
        let base = self.default_api_base().trim_end_matches("/api");
        format!("{}/tx/{}", base, txid)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
