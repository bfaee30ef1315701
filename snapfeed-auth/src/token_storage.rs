use crate::error::AuthError;
use snapfeed_api::{StoreError, TokenStorage};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Token storage backed by a JSON file, written through on every change.
pub struct TokenStore {
    token_path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl TokenStore {
    pub fn new() -> Result<Self, AuthError> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| AuthError::Configuration("Could not find cache directory".to_string()))?
            .join("snapfeed");
        Self::open(cache_dir.join("tokens.json"))
    }

    pub fn open(token_path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let token_path = token_path.as_ref().to_path_buf();

        // Create cache directory if it doesn't exist
        if let Some(dir) = token_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to create cache directory: {}", e))
                })?;
            }
        }

        let entries = if token_path.exists() {
            let json = fs::read_to_string(&token_path)
                .map_err(|e| AuthError::TokenStorage(format!("Failed to read tokens: {}", e)))?;
            if json.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&json)?
            }
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %token_path.display(), keys = entries.len(), "Token store opened");

        Ok(Self {
            token_path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.token_path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if entries.is_empty() {
            if self.token_path.exists() {
                fs::remove_file(&self.token_path)?;
            }
            return Ok(());
        }

        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.token_path, json)?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        Ok(())
    }
}

impl TokenStorage for TokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
