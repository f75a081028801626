//! Client state persisted between `cw` invocations.
//!
//! The file holds the bearer token, the account it belongs to, and the
//! cart/wishlist. It is rewritten whole on every change; two `cw` processes
//! racing on the same file keep whichever wrote last.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cartwheel_core::{Email, Role, ShopState};

/// State file failures.
#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid state file: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Opaque bearer token.
    pub token: String,
    pub email: Email,
    pub name: String,
    pub role: Role,
}

/// Everything `cw` remembers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(default)]
    pub session: Option<StoredSession>,
    #[serde(default)]
    pub shop: ShopState,
}

impl ClientState {
    /// Read the state file. A missing file is an empty state.
    ///
    /// # Errors
    ///
    /// Returns `StateFileError` if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, StateFileError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(StateFileError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StateFileError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the state file, creating its directory if needed.
    ///
    /// The file is written beside the target and renamed into place so a
    /// crash never leaves a half-written file.
    ///
    /// # Errors
    ///
    /// Returns `StateFileError::Io` if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<(), StateFileError> {
        let io_err = |source| StateFileError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_vec_pretty(self).map_err(|source| StateFileError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}
