use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use axum::async_trait;
use bills_api::{Bill, BillStatus, ExpenseType, StoredFile, UpdateRequest, Upload};
use tracing::debug;
use ulid::Ulid;

use super::{BillsRepository, Error, Result};

/// In-memory bills resource. Failures can be queued to simulate a failing
/// backend; every update request is recorded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bills: Mutex<Vec<Bill>>,
    files: Mutex<HashMap<String, Upload>>,
    failures: Mutex<VecDeque<Error>>,
    updates: Mutex<Vec<UpdateRequest>>,
}

impl MemoryStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: Mutex::new(bills),
            ..Self::default()
        }
    }

    /// The next store call fails with `err`.
    #[cfg(test)]
    pub fn fail_next(&self, err: Error) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(err);
    }

    #[cfg(test)]
    pub fn updates(&self) -> Vec<UpdateRequest> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[cfg(test)]
    pub fn files(&self) -> Vec<Upload> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    fn next_failure(&self) -> Result<()> {
        match self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BillsRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Bill>> {
        self.next_failure()?;
        Ok(self
            .bills
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn create(&self, upload: Upload) -> Result<StoredFile> {
        self.next_failure()?;

        let key = Ulid::new().to_string();
        let stored = StoredFile {
            file_url: format!("memory://bills/{}/{}", key, upload.file_name),
            key: key.clone(),
        };
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, upload);

        Ok(stored)
    }

    async fn update(&self, req: UpdateRequest) -> Result<Bill> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());
        self.next_failure()?;

        let mut bill: Bill = serde_json::from_str(&req.data)?;
        let id = req.selector.unwrap_or_else(|| Ulid::new().to_string());
        bill.id = Some(id.clone());
        debug!(%id, "storing bill");

        let mut bills = self.bills.lock().unwrap_or_else(PoisonError::into_inner);
        match bills.iter_mut().find(|b| b.id.as_deref() == Some(id.as_str())) {
            Some(existing) => *existing = bill.clone(),
            None => bills.push(bill.clone()),
        }

        Ok(bill)
    }
}

fn fixture(
    id: &str,
    expense_type: ExpenseType,
    name: &str,
    date: &str,
    amount: f64,
    status: BillStatus,
) -> Bill {
    Bill {
        id: Some(id.to_string()),
        email: Some("a@a".to_string()),
        expense_type,
        name: name.to_string(),
        date: date.to_string(),
        amount,
        vat: 20.0,
        pct: 20,
        commentary: "séminaire billed".to_string(),
        file_url: Some(format!("memory://bills/{}/preview-facture-free.jpg", id)),
        file_name: Some("preview-facture-free.jpg".to_string()),
        status,
    }
}

/// Sample bills, deliberately stored out of date order.
pub fn fixtures() -> Vec<Bill> {
    vec![
        fixture(
            "47qAXb6fIm2zOKkLzMro",
            ExpenseType::Lodging,
            "encore",
            "2004-04-04",
            400.0,
            BillStatus::Pending,
        ),
        fixture(
            "BeKy5Mo4jkmdfPGYpTxZ",
            ExpenseType::Transports,
            "test1",
            "2001-01-01",
            100.0,
            BillStatus::Refused,
        ),
        fixture(
            "UIUZtnPQvnbFnB0ozvJh",
            ExpenseType::OnlineServices,
            "test3",
            "2003-03-03",
            300.0,
            BillStatus::Accepted,
        ),
        fixture(
            "qcCK3SzECmaZAGRrHjaC",
            ExpenseType::Restaurants,
            "test2",
            "2002-02-02",
            200.0,
            BillStatus::Refused,
        ),
    ]
}
