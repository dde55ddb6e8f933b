use std::time::Duration;

use axum::async_trait;
use bills_api::{Bill, Client, StoredFile, UpdateRequest, Upload};

use super::{BillsRepository, Result};

pub struct HttpStore {
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::new(base_url)?.with_timeout(timeout),
        })
    }
}

#[async_trait]
impl BillsRepository for HttpStore {
    async fn list(&self) -> Result<Vec<Bill>> {
        Ok(self.client.list_bills().await?)
    }

    async fn create(&self, upload: Upload) -> Result<StoredFile> {
        Ok(self.client.create_file(&upload).await?)
    }

    async fn update(&self, req: UpdateRequest) -> Result<Bill> {
        Ok(self.client.update_bill(&req).await?)
    }
}
