use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key holding the JSON encoded session [`User`].
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

type Result<T> = ::std::result::Result<T, Error>;

/// String key-value storage persisted across page visits.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type")]
    pub ty: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub fn current_user(storage: &dyn LocalStorage) -> Result<Option<User>> {
    match storage.get_item(USER_KEY) {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn set_user(storage: &dyn LocalStorage, user: &User) -> Result<()> {
    storage.set_item(USER_KEY, &serde_json::to_string(user)?)
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create default data directory if none exists.
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut fd = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        let mut content = String::new();
        fd.read_to_string(&mut content)?;
        let items: HashMap<String, String> = serde_json::from_str(&content).unwrap_or_default();

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    fn flush(&self, items: &HashMap<String, String>) -> Result<()> {
        let mut fd = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        write!(fd, "{}", serde_json::to_string_pretty(items)?)?;
        fd.flush()?;

        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_employee_session() {
        let storage = MemoryStorage::new();
        storage
            .set_item(USER_KEY, r#"{"type":"Employee"}"#)
            .unwrap();

        let user = current_user(&storage).unwrap().unwrap();
        assert_eq!(user.ty, UserType::Employee);
        assert_eq!(user.email, None);
    }

    #[test]
    fn missing_session_is_none() {
        assert_eq!(current_user(&MemoryStorage::new()).unwrap(), None);
    }

    #[test]
    fn malformed_session_is_an_error() {
        let storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "{not json").unwrap();

        assert!(matches!(current_user(&storage), Err(Error::Parse(_))));
    }

    #[test]
    fn file_storage_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billed").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        let user = User {
            ty: UserType::Admin,
            email: Some("admin@test.tld".into()),
        };
        set_user(&storage, &user).unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(current_user(&reopened).unwrap(), Some(user));

        reopened.remove_item(USER_KEY).unwrap();
        assert_eq!(current_user(&FileStorage::open(&path).unwrap()).unwrap(), None);
    }
}
