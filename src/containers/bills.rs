use std::sync::Arc;

use bills_api::Bill;
use tracing::{error, info};

use crate::router::{Navigator, Route};
use crate::store::{self, BillsRepository};

pub struct Bills {
    store: Arc<dyn BillsRepository>,
    navigator: Navigator,
}

impl Bills {
    pub fn new(store: Arc<dyn BillsRepository>, navigator: Navigator) -> Self {
        Self { store, navigator }
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    pub async fn get_bills(&self) -> store::Result<Vec<Bill>> {
        match self.store.list().await {
            Ok(bills) => {
                info!(count = bills.len(), "fetched bills");
                Ok(bills)
            }
            Err(err) => {
                error!(error = %err, "failed to fetch bills");
                Err(err)
            }
        }
    }
}
