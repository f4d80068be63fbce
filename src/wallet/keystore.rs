//! KeyStore - one WIF-encoded private key in an owner-only file.
//!
//! The file is created exclusively (`create_new`) with mode 0600 before any key
//! material is written, so a second first-run process sees `AlreadyExists` and
//! loads instead of overwriting. An existing file is never rewritten. The loser
//! of a first-run race may open the file before the winner's write lands, so an
//! empty file is re-read for a short while before it counts as corrupt.

use super::key::SigningKey;
use crate::config::{WalletConfig, DEFAULT_KEY_FILENAME};
use crate::error::{WalletError, WalletResult};
use crate::network::Network;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};
use zeroize::Zeroizing;

const EMPTY_READ_ATTEMPTS: u32 = 40;
const EMPTY_READ_BACKOFF: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub struct KeyStore {
    directory: PathBuf,
    filename: String,
    network: Network,
}

impl KeyStore {
    pub fn new(directory: impl Into<PathBuf>, network: Network) -> Self {
        Self { directory: directory.into(), filename: DEFAULT_KEY_FILENAME.into(), network }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(&config.data_dir, config.network).with_filename(&config.key_filename)
    }

    pub fn with_filename(mut self, name: impl Into<String>) -> Self { self.filename = name.into(); self }

    pub fn path(&self) -> PathBuf { self.directory.join(&self.filename) }

    /// Return the persisted key, generating and persisting one on first use.
    pub fn ensure_key_file(&self) -> WalletResult<SigningKey> {
        std::fs::create_dir_all(&self.directory)
            .map_err(|e| WalletError::KeyStore(format!("mkdir {}: {}", self.directory.display(), e)))?;

        let path = self.path();
        let mut file = match create_owner_only(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return self.load_written_key(),
            Err(e) => return Err(WalletError::KeyStore(format!("create {}: {}", path.display(), e))),
        };

        let key = SigningKey::generate(self.network)?;
        let wif = key.to_wif();
        if let Err(e) = file.write_all(wif.as_bytes()).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(WalletError::KeyStore(format!("write {}: {}", path.display(), e)));
        }

        info!(path = %path.display(), address = %key.legacy_address(), "created wallet key");
        Ok(key)
    }

    pub fn load_key(&self) -> WalletResult<SigningKey> {
        let contents = self.read_contents()?;
        self.parse(&contents)
    }

    /// Like `load_key`, but waits out a concurrent creator that has not written yet.
    fn load_written_key(&self) -> WalletResult<SigningKey> {
        for attempt in 1..=EMPTY_READ_ATTEMPTS {
            let contents = self.read_contents()?;
            if !contents.trim().is_empty() {
                return self.parse(&contents);
            }
            debug!(attempt, path = %self.path().display(), "key file still empty");
            thread::sleep(EMPTY_READ_BACKOFF);
        }
        Err(WalletError::KeyStore(format!("key file {} is empty", self.path().display())))
    }

    fn read_contents(&self) -> WalletResult<Zeroizing<String>> {
        let path = self.path();
        std::fs::read_to_string(&path)
            .map(Zeroizing::new)
            .map_err(|e| WalletError::KeyStore(format!("read {}: {}", path.display(), e)))
    }

    fn parse(&self, contents: &str) -> WalletResult<SigningKey> {
        let key = SigningKey::from_wif(contents, self.network)?;
        info!(address = %key.legacy_address(), "loaded wallet key");
        Ok(key)
    }
}

#[cfg(unix)]
fn create_owner_only(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new().write(true).create_new(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn create_owner_only(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
