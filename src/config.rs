//! Wallet Configuration - passed from the CLI or an embedding application

use crate::network::Network;
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "BEEWALLET_DATA_DIR";
pub const ENV_NETWORK: &str = "BEEWALLET_NETWORK";
pub const ENV_API_URL: &str = "BEEWALLET_API_URL";

pub const DEFAULT_KEY_FILENAME: &str = "wallet.key";

#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub network: Network,
    /// Data service base; `None` uses the network default.
    pub api_base: Option<String>,
    /// Directory holding the key file.
    pub data_dir: PathBuf,
    pub key_filename: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            api_base: None,
            data_dir: default_data_dir(),
            key_filename: DEFAULT_KEY_FILENAME.into(),
        }
    }
}

impl WalletConfig {
    pub fn new(network: Network) -> Self { Self { network, ..Default::default() } }
    pub fn with_network(mut self, network: Network) -> Self { self.network = network; self }
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self { self.api_base = Some(url.into()); self }
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self { self.data_dir = path.into(); self }
    pub fn with_key_filename(mut self, name: impl Into<String>) -> Self { self.key_filename = name.into(); self }

    /// Build from `BEEWALLET_*` environment variables. Unknown network names fall back to signet.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(net) = std::env::var(ENV_NETWORK).ok().and_then(|v| Network::from_str(&v)) {
            config.network = net;
        }
        if let Some(url) = std::env::var(ENV_API_URL).ok().filter(|s| !s.is_empty()) {
            config.api_base = Some(url);
        }
        if let Some(dir) = std::env::var(ENV_DATA_DIR).ok().filter(|s| !s.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(self.network.default_api_base())
    }

    pub fn key_path(&self) -> PathBuf { self.data_dir.join(&self.key_filename) }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("beewallet"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
