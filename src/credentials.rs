use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const ENV_API_KEY: &str = "CMAIL_API_KEY";
const KEYRING_SERVICE: &str = "cmail";
const KEYRING_KEY: &str = "gemini-api-key";

/// Storage for the Gemini API key.
///
/// Lookup order: environment variable, system keyring, then a restricted
/// file in the config directory.
pub struct ApiKeyStore {
    key_file: PathBuf,
}

impl ApiKeyStore {
    pub fn new() -> Self {
        let key_file = crate::config::Config::config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".api_key");

        Self { key_file }
    }

    fn env_key() -> Option<String> {
        env::var(ENV_API_KEY).ok().filter(|s| !s.is_empty())
    }

    fn keyring_get(&self) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY).ok()?;
        entry.get_password().ok()
    }

    fn keyring_set(&self, api_key: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY) {
            entry.set_password(api_key).is_ok()
        } else {
            false
        }
    }

    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.key_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn file_set(&self, api_key: &str) -> Result<()> {
        if let Some(parent) = self.key_file.parent() {
            fs::create_dir_all(parent)?;
        }

        // Restricted permissions from creation to avoid TOCTOU
        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.key_file)?;
            file.write_all(api_key.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.key_file, api_key)?;
        }

        Ok(())
    }

    pub fn get(&self) -> Result<String> {
        if let Some(key) = Self::env_key() {
            return Ok(key);
        }

        if let Some(key) = self.keyring_get() {
            return Ok(key);
        }

        if let Some(key) = self.file_get() {
            return Ok(key);
        }

        anyhow::bail!("API key not found. Set CMAIL_API_KEY or run 'cmail setup'.")
    }

    pub fn set(&self, api_key: &str) -> Result<()> {
        if self.keyring_set(api_key) && self.keyring_get().is_some() {
            return Ok(());
        }

        eprintln!("Note: Keyring unavailable, using file-based storage.");
        self.file_set(api_key)?;

        Ok(())
    }

    pub fn has_key(&self) -> bool {
        Self::env_key().is_some() || self.keyring_get().is_some() || self.file_get().is_some()
    }
}
