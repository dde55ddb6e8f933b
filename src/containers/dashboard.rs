use std::sync::Arc;

use bills_api::{Bill, BillStatus};
use tracing::error;

use crate::store::{self, BillsRepository};

pub fn filtered_bills(bills: &[Bill], status: BillStatus) -> Vec<&Bill> {
    bills.iter().filter(|bill| bill.status == status).collect()
}

/// Admin overview over every submitted bill.
pub struct Dashboard {
    store: Arc<dyn BillsRepository>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn BillsRepository>) -> Self {
        Self { store }
    }

    pub async fn get_bills(&self) -> store::Result<Vec<Bill>> {
        self.store.list().await.map_err(|err| {
            error!(error = %err, "failed to fetch bills for dashboard");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures;

    #[test]
    fn filters_by_status() {
        let bills = fixtures();

        let refused = filtered_bills(&bills, BillStatus::Refused);
        assert_eq!(refused.len(), 2);
        assert!(refused.iter().all(|b| b.status == BillStatus::Refused));
        assert_eq!(filtered_bills(&[], BillStatus::Pending).len(), 0);
    }
}
