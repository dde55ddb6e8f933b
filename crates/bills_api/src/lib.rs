//! Client for the billed backend `bills` resource.

mod model;

pub use model::{Bill, BillStatus, ExpenseType, StoredFile, UpdateRequest, Upload};

use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// How long a backend request may take, response body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("invalid backend url")]
    Url(#[from] url::ParseError),
    #[error("invalid request uri")]
    Uri(#[from] hyper::http::uri::InvalidUri),
    #[error("failed to build request")]
    Request(#[from] hyper::http::Error),
    #[error("backend request failed")]
    Transport(#[from] hyper::Error),
    #[error("unable to parse backend payload")]
    Parse(#[from] serde_json::Error),
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ErrorBody>(body) {
            Ok(e) => e.message,
            Err(_) if !body.is_empty() => String::from_utf8_lossy(body).into_owned(),
            Err(_) => format!("Erreur {}", status.as_u16()),
        };

        ApiError::Status { status, message }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: hyper::Client<HttpConnector>,
    timeout: Duration,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            base_url,
            http: hyper::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_bills(&self) -> Result<Vec<Bill>, ApiError> {
        self.send(Method::GET, "bills", Body::empty()).await
    }

    pub async fn create_file(&self, upload: &Upload) -> Result<StoredFile, ApiError> {
        let body = serde_json::to_vec(upload)?;
        self.send(Method::POST, "files", Body::from(body)).await
    }

    pub async fn update_bill(&self, req: &UpdateRequest) -> Result<Bill, ApiError> {
        let (method, path) = match &req.selector {
            Some(id) => (Method::PATCH, format!("bills/{}", id)),
            None => (Method::POST, "bills".to_string()),
        };

        self.send(method, &path, Body::from(req.data.clone())).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
    ) -> Result<T, ApiError> {
        tokio::time::timeout(self.timeout, self.exchange(method, path, body))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))?
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
    ) -> Result<T, ApiError> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "sending backend request");

        let req = Request::builder()
            .method(method)
            .uri(url.as_str().parse::<hyper::Uri>()?)
            .header(CONTENT_TYPE, "application/json")
            .body(body)?;

        let res = self.http.request(req).await?;
        let status = res.status();
        let bytes = hyper::body::to_bytes(res.into_body()).await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status, &bytes));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
