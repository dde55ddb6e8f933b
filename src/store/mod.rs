mod http;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use bills_api::{ApiError, Bill, StoredFile, UpdateRequest, Upload};
use thiserror::Error;
use tracing::info;

pub use http::HttpStore;
pub use memory::{fixtures, MemoryStore};

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum Error {
    /// Generic backend rejection carrying the backend's message.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        self.to_string() == other.to_string()
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { message, .. } => Error::Rejected(message),
            err => Error::Api(err),
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

/// The `bills` resource of the backend store.
#[async_trait]
pub trait BillsRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Bill>>;

    /// Stores a proof file and reserves the key of the bill it belongs to.
    async fn create(&self, upload: Upload) -> Result<StoredFile>;

    async fn update(&self, req: UpdateRequest) -> Result<Bill>;
}

pub fn from_settings(settings: &Settings) -> Result<Arc<dyn BillsRepository>> {
    match &settings.api_url {
        Some(url) => {
            let timeout = Duration::from_secs(settings.api_timeout_secs);
            info!(%url, ?timeout, "using backend store");
            Ok(Arc::new(HttpStore::new(url, timeout)?))
        }
        None => {
            info!("no api_url configured, using in-memory store");
            Ok(Arc::new(MemoryStore::with_bills(fixtures())))
        }
    }
}
