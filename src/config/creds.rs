// src/config/creds.rs

use crate::{
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// On-disk credential record. Every field is optional so a hand-edited or
/// partially filled file still loads; helpers below decide what counts as
/// usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn client_pair(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id, secret))
            }
            _ => None,
        }
    }

    pub fn token_pair(&self) -> Option<(&str, &str)> {
        match (self.access_token.as_deref(), self.refresh_token.as_deref()) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some((access, refresh))
            }
            _ => None,
        }
    }
}

/// Handle to the credentials file. The path is fixed at construction so the
/// same store reads and writes one location for the whole run.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Default location is `creds.json` next to the executable. The
    /// environment variable takes precedence when set, mainly so tests and
    /// scripted runs can redirect the file.
    pub fn at_default_location() -> AppResult<Self> {
        if let Ok(path) = env::var(constants::CREDS_PATH_ENV)
            && !path.is_empty()
        {
            debug!("credentials path taken from {}", constants::CREDS_PATH_ENV);
            return Ok(Self { path: PathBuf::from(path) });
        }
        let exe = env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| AppError::Other(anyhow!("cannot determine the executable's directory")))?;
        Ok(Self {
            path: dir.join(constants::CREDS_FILE_NAME),
        })
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is not an error: it reads as an empty record, and the
    /// interactive loops fill in the blanks.
    pub fn load(&self) -> AppResult<Credentials> {
        if self.path.is_file() {
            let content = fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read credentials file '{}'", self.path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse credentials file '{}'", self.path.display()))
                .map_err(AppError::from)
        } else {
            info!("credentials file {:?} not found, starting with an empty record", self.path);
            Ok(Credentials::default())
        }
    }

    /// Rewrites the whole file. Fields cleared in memory disappear on disk.
    pub fn save(&self, creds: &Credentials) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json_content = serde_json::to_string_pretty(creds)?;
        fs::write(&self.path, json_content)
            .with_context(|| format!("failed to write credentials to '{}'", self.path.display()))?;
        info!("credentials saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn full_record() -> Credentials {
        Credentials {
            client_id: Some("abc123".to_string()),
            client_secret: Some("s3cret".to_string()),
            access_token: Some("tok".to_string()),
            refresh_token: Some("ref".to_string()),
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("creds.json"));

        let creds = full_record();
        store.save(&creds).unwrap();

        assert_eq!(store.load().unwrap(), creds);
    }

    #[test]
    fn test_missing_file_loads_empty_record() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("creds.json"));

        assert_eq!(store.load().unwrap(), Credentials::default());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("creds.json"));

        store.save(&full_record()).unwrap();

        let partial = Credentials {
            client_id: Some("abc123".to_string()),
            client_secret: Some("s3cret".to_string()),
            ..Default::default()
        };
        store.save(&partial).unwrap();

        // The previously stored tokens must be gone, not merged back in.
        assert_eq!(store.load().unwrap(), partial);
    }

    #[test]
    fn test_pairs_require_both_halves() {
        let mut creds = Credentials::default();
        assert!(creds.client_pair().is_none());

        creds.client_id = Some("abc123".to_string());
        assert!(creds.client_pair().is_none());

        creds.client_secret = Some(String::new());
        assert!(creds.client_pair().is_none());

        creds.client_secret = Some("s3cret".to_string());
        assert_eq!(creds.client_pair(), Some(("abc123", "s3cret")));
        assert!(creds.token_pair().is_none());
    }
}
