//! Credential store implementations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AuthUser, CredentialStore, Credentials};

/// Errors that can occur when loading a persisted credential file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the credential file failed.
    #[error("Credential file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file exists but is not valid JSON.
    #[error("Credential file {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-process credential store.
///
/// Each client built without an explicit store gets its own, so tests never
/// share session state by accident.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credentials>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    #[must_use]
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slot: RwLock::new(Some(credentials)),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Credentials) -> T) -> Option<T> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(f)
    }

    fn replace(&self, value: Option<Credentials>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<SecretString> {
        self.read(|c| c.access_token.clone())
    }

    fn refresh_token(&self) -> Option<SecretString> {
        self.read(|c| c.refresh_token.clone()).flatten()
    }

    fn user(&self) -> Option<AuthUser> {
        self.read(|c| c.user.clone())
    }

    fn save_auth(&self, token: SecretString, user: AuthUser, refresh_token: Option<SecretString>) {
        self.replace(Some(Credentials {
            access_token: token,
            refresh_token,
            user,
        }));
    }

    fn clear_auth(&self) {
        self.replace(None);
    }

    fn credentials(&self) -> Option<Credentials> {
        self.read(Clone::clone)
    }
}

/// On-disk layout of a persisted session.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAuth {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    user: AuthUser,
}

/// Credential store backed by a JSON file.
///
/// The file is read once when the store is opened; afterwards the
/// in-memory copy is authoritative for the process and every change is
/// written through. A failed write is logged and does not fail the
/// request that caused it.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    memory: MemoryCredentialStore,
    /// Held across the memory update and the disk write, so the file
    /// always matches the last change made in memory.
    write: Mutex<()>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading any session already saved there.
    ///
    /// A missing file is an empty session.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let memory = match std::fs::read(&path) {
            Ok(bytes) => {
                let persisted: PersistedAuth =
                    serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                MemoryCredentialStore::with_credentials(Credentials {
                    access_token: SecretString::from(persisted.token),
                    refresh_token: persisted.refresh_token.map(SecretString::from),
                    user: persisted.user,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryCredentialStore::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };

        tracing::debug!(path = %path.display(), "Opened credential file");
        Ok(Self {
            path,
            memory,
            write: Mutex::new(()),
        })
    }

    /// Location of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let Some(credentials) = self.memory.credentials() else {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_err(e)),
            };
        };

        let persisted = PersistedAuth {
            token: credentials.access_token.expose_secret().to_string(),
            refresh_token: credentials
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            user: credentials.user,
        };
        let bytes = serde_json::to_vec_pretty(&persisted).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;

        // A uniquely named owner-only sibling, renamed into place, so a crash
        // never leaves half a token behind.
        let mut tmp = tempfile::Builder::new()
            .prefix(".credentials")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&MemoryCredentialStore)) {
        let _write = self.write.lock().unwrap_or_else(PoisonError::into_inner);
        change(&self.memory);
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "Failed to persist credentials");
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<SecretString> {
        self.memory.token()
    }

    fn refresh_token(&self) -> Option<SecretString> {
        self.memory.refresh_token()
    }

    fn user(&self) -> Option<AuthUser> {
        self.memory.user()
    }

    fn save_auth(&self, token: SecretString, user: AuthUser, refresh_token: Option<SecretString>) {
        self.update(|memory| memory.save_auth(token, user, refresh_token));
    }

    fn clear_auth(&self) {
        self.update(MemoryCredentialStore::clear_auth);
    }

    fn credentials(&self) -> Option<Credentials> {
        self.memory.credentials()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{UserId, UserRole};

    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: UserId::new("u-1"),
            name: "Meera".to_string(),
            email: "meera@example.in".to_string(),
            role: UserRole::Customer,
            avatar: None,
        }
    }

    #[test]
    fn test_memory_store_save_and_clear() {
        let store = MemoryCredentialStore::new();
        assert!(store.token().is_none());

        store.save_auth(
            SecretString::from("T1"),
            user(),
            Some(SecretString::from("R1")),
        );
        assert_eq!(store.token().unwrap().expose_secret(), "T1");
        assert_eq!(store.refresh_token().unwrap().expose_secret(), "R1");
        assert_eq!(store.user().unwrap().name, "Meera");

        store.clear_auth();
        assert!(store.token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_memory_store_overwrite_drops_old_refresh_token() {
        let store = MemoryCredentialStore::new();
        store.save_auth(
            SecretString::from("T1"),
            user(),
            Some(SecretString::from("R1")),
        );
        store.save_auth(SecretString::from("T2"), user(), None);
        assert_eq!(store.token().unwrap().expose_secret(), "T2");
        assert!(store.refresh_token().is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::open(dir.path().join("credentials.json")).unwrap();
        assert!(store.credentials().is_none());
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = FileCredentialStore::open(&path).unwrap();
        store.save_auth(
            SecretString::from("T1"),
            user(),
            Some(SecretString::from("R1")),
        );
        assert!(path.exists());

        let reopened = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "T1");
        assert_eq!(reopened.refresh_token().unwrap().expose_secret(), "R1");
        assert_eq!(reopened.user().unwrap(), user());
    }

    #[test]
    fn test_file_store_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileCredentialStore::open(&path).unwrap();
        store.save_auth(SecretString::from("T1"), user(), None);
        store.clear_auth();

        assert!(!path.exists());
        assert!(FileCredentialStore::open(&path).unwrap().token().is_none());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, b"{not json").unwrap();

        let result = FileCredentialStore::open(&path);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_file_store_disk_matches_memory_under_concurrent_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        for round in 0..50 {
            let store = FileCredentialStore::open(&path).unwrap();
            std::thread::scope(|scope| {
                for n in 0..3 {
                    let store = &store;
                    scope.spawn(move || {
                        store.save_auth(
                            SecretString::from(format!("T{round}-{n}")),
                            user(),
                            Some(SecretString::from("R")),
                        );
                    });
                }
                scope.spawn(|| store.clear_auth());
            });

            let in_memory = store.token().map(|t| t.expose_secret().to_string());
            let on_disk = FileCredentialStore::open(&path)
                .unwrap()
                .token()
                .map(|t| t.expose_secret().to_string());
            assert_eq!(in_memory, on_disk, "round {round}");
        }

        // No temp files left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "credentials.json")
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileCredentialStore::open(&path).unwrap();
        store.save_auth(SecretString::from("T1"), user(), None);

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
