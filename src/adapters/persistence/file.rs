//! JSON file backend.
//!
//! The whole store is one pretty-printed document `{ keys, users, admins }`.
//! A bare array of `{ apiKey, createdAt }` objects (the older on-disk format)
//! is read as a document with only keys and rewritten in the new shape on the
//! next write.
//!
//! Writers are serialised by an async mutex and replace the file through a
//! temp file + rename, so readers never observe a half-written document and
//! do not take the lock.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult, DuplicateField},
    domain::entities::{
        admin::Admin,
        api_key::ApiKey,
        user::{User, UserWithKey},
    },
    infra::error::InfraError,
    use_cases::{
        admin::AdminRepo,
        api_key::KeyStore,
        user::{NewUser, UserRepo},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKey {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    api_key: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner_id: Option<Uuid>,
}

impl From<&StoredKey> for ApiKey {
    fn from(stored: &StoredKey) -> Self {
        ApiKey {
            id: stored.id,
            value: stored.api_key.clone(),
            created_at: stored.created_at,
            revoked: stored.revoked,
            owner_id: stored.owner_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    api_key_id: Uuid,
}

impl From<&StoredUser> for User {
    fn from(stored: &StoredUser) -> Self {
        User {
            id: stored.id,
            first_name: stored.first_name.clone(),
            last_name: stored.last_name.clone(),
            email: stored.email.clone(),
            api_key_id: stored.api_key_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAdmin {
    email: String,
    password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileDocument {
    #[serde(default)]
    keys: Vec<StoredKey>,
    #[serde(default)]
    users: Vec<StoredUser>,
    #[serde(default)]
    admins: Vec<StoredAdmin>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Legacy(Vec<StoredKey>),
    Document(FileDocument),
}

impl FileDocument {
    /// Parses either on-disk shape. The flag is set for the older bare array.
    fn parse(raw: &[u8]) -> serde_json::Result<(Self, bool)> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok((Self::default(), false));
        }
        Ok(match serde_json::from_slice::<OnDisk>(raw)? {
            OnDisk::Legacy(keys) => (
                FileDocument {
                    keys,
                    ..Default::default()
                },
                true,
            ),
            OnDisk::Document(doc) => (doc, false),
        })
    }

    fn key_exists(&self, value: &str) -> bool {
        self.keys.iter().any(|k| k.api_key == value)
    }

    fn push_key(&mut self, value: &str, owner_id: Option<Uuid>) -> AppResult<ApiKey> {
        if self.key_exists(value) {
            return Err(AppError::Duplicate(DuplicateField::ApiKey));
        }
        let stored = StoredKey {
            id: Uuid::new_v4(),
            api_key: value.to_string(),
            created_at: Utc::now(),
            revoked: false,
            owner_id,
        };
        let key = ApiKey::from(&stored);
        self.keys.push(stored);
        Ok(key)
    }
}

pub struct FilePersistence {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePersistence {
    /// Opens the store, checking that an existing file is readable and parses.
    /// A missing file is fine and is created on first write. A file in the
    /// older array format is rewritten as a document right away, so the ids
    /// assigned to its keys are persisted.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let path = path.into();
        match tokio::fs::read(&path).await {
            Ok(raw) => {
                let (doc, legacy) = FileDocument::parse(&raw).map_err(|e| InfraError::KeyFile {
                    path: path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
                })?;
                if legacy {
                    write_document(&path, &doc)
                        .await
                        .map_err(|source| InfraError::KeyFile {
                            path: path.clone(),
                            source,
                        })?;
                    tracing::info!(
                        path = %path.display(),
                        keys = doc.keys.len(),
                        "Migrated key file to document format"
                    );
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(InfraError::KeyFile { path, source }),
        }

        tracing::info!(path = %path.display(), "Using file key store");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AppResult<FileDocument> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileDocument::default()),
            Err(e) => return Err(self.io_error(e)),
        };

        // Refuse to continue on a corrupt file; a later write would wipe it.
        let (doc, legacy) = FileDocument::parse(&raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Key file is not valid JSON");
            AppError::Database("Key store is unreadable".into())
        })?;
        if legacy {
            tracing::warn!(
                path = %self.path.display(),
                "Key file was replaced with the array format; ids are unstable until the next write"
            );
        }
        Ok(doc)
    }

    async fn save(&self, doc: &FileDocument) -> AppResult<()> {
        write_document(&self.path, doc)
            .await
            .map_err(|e| self.io_error(e))
    }

    /// Read-modify-write under the writer lock. Nothing is written when `f` fails.
    async fn update<T>(&self, f: impl FnOnce(&mut FileDocument) -> AppResult<T>) -> AppResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.save(&doc).await?;
        Ok(out)
    }

    fn io_error(&self, err: std::io::Error) -> AppError {
        tracing::error!(path = %self.path.display(), error = %err, "Key file I/O failed");
        AppError::Database("Key store operation failed".into())
    }
}

/// Replaces `path` through a sibling temp file and a rename.
async fn write_document(path: &Path, doc: &FileDocument) -> std::io::Result<()> {
    let raw = serde_json::to_vec_pretty(doc)?;

    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, raw).await?;
    tokio::fs::rename(&tmp, path).await
}

#[async_trait]
impl KeyStore for FilePersistence {
    async fn insert(&self, value: &str, owner_id: Option<Uuid>) -> AppResult<ApiKey> {
        self.update(|doc| doc.push_key(value, owner_id)).await
    }

    async fn get_by_value(&self, value: &str) -> AppResult<Option<ApiKey>> {
        let doc = self.load().await?;
        Ok(doc
            .keys
            .iter()
            .find(|k| k.api_key == value)
            .map(ApiKey::from))
    }

    async fn list(&self) -> AppResult<Vec<ApiKey>> {
        let doc = self.load().await?;
        // Appended in issue order, so reversing gives newest first.
        Ok(doc.keys.iter().rev().map(ApiKey::from).collect())
    }

    async fn revoke(&self, value: &str) -> AppResult<bool> {
        self.update(|doc| {
            Ok(match doc.keys.iter_mut().find(|k| k.api_key == value) {
                Some(key) => {
                    key.revoked = true;
                    true
                }
                None => false,
            })
        })
        .await
    }
}

#[async_trait]
impl UserRepo for FilePersistence {
    async fn create_with_key(&self, user: &NewUser, key_value: &str) -> AppResult<(User, ApiKey)> {
        self.update(|doc| {
            if doc.users.iter().any(|u| u.email == user.email) {
                return Err(AppError::Duplicate(DuplicateField::Email));
            }

            let user_id = Uuid::new_v4();
            let key = doc.push_key(key_value, Some(user_id))?;
            let stored = StoredUser {
                id: user_id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                api_key_id: key.id,
            };
            let created = User::from(&stored);
            doc.users.push(stored);
            Ok((created, key))
        })
        .await
    }

    async fn list_with_keys(&self) -> AppResult<Vec<UserWithKey>> {
        let doc = self.load().await?;
        let mut rows: Vec<UserWithKey> = doc
            .users
            .iter()
            .filter_map(|u| {
                let key = doc.keys.iter().find(|k| k.id == u.api_key_id)?;
                Some(UserWithKey {
                    id: u.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                    api_key: key.api_key.clone(),
                    created_at: key.created_at,
                    revoked: key.revoked,
                })
            })
            .collect();
        rows.reverse();
        Ok(rows)
    }
}

#[async_trait]
impl AdminRepo for FilePersistence {
    async fn create(&self, email: &str, password: &str) -> AppResult<Admin> {
        self.update(|doc| {
            if doc.admins.iter().any(|a| a.email == email) {
                return Err(AppError::Duplicate(DuplicateField::Email));
            }
            doc.admins.push(StoredAdmin {
                email: email.to_string(),
                password: password.to_string(),
            });
            Ok(Admin {
                email: email.to_string(),
                password: password.to_string(),
            })
        })
        .await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let doc = self.load().await?;
        Ok(doc.admins.iter().find(|a| a.email == email).map(|a| Admin {
            email: a.email.clone(),
            password: a.password.clone(),
        }))
    }
}
