use std::sync::Arc;

use bills_api::{Bill, UpdateRequest, Upload};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::{bill_from_form, is_accepted_mime, FormError};
use crate::dom::{FileInput, SelectedFile, SubmitEvent};
use crate::router::{Navigator, Route};
use crate::storage::{self, LocalStorage};
use crate::store::{self, BillsRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub file_name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejected {
    #[error("no file selected")]
    Empty,
    #[error("unsupported file type {mime_type:?} for {file_name}")]
    UnsupportedType {
        file_name: String,
        mime_type: String,
    },
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The backend stored the bill.
    Stored(Bill),
    /// The backend rejected the bill. Already logged.
    Failed(store::Error),
    /// The form could not be turned into a bill; nothing was sent.
    Invalid(FormError),
}

impl SubmissionOutcome {
    fn log(&self) {
        match self {
            SubmissionOutcome::Stored(bill) => info!(id = ?bill.id, "bill submitted"),
            SubmissionOutcome::Failed(err) => error!(error = %err, "failed to submit bill"),
            SubmissionOutcome::Invalid(err) => {
                warn!(error = %err, "new bill form is not complete")
            }
        }
    }
}

/// Controller of the new bill form. One instance per visit of the page; it
/// owns the proof file picked by the user until the form is submitted.
pub struct NewBill {
    store: Arc<dyn BillsRepository>,
    storage: Arc<dyn LocalStorage>,
    navigator: Navigator,
    file: Option<SelectedFile>,
}

impl NewBill {
    pub fn new(
        store: Arc<dyn BillsRepository>,
        storage: Arc<dyn LocalStorage>,
        navigator: Navigator,
    ) -> Self {
        Self {
            store,
            storage,
            navigator,
            file: None,
        }
    }

    /// The proof file retained for the next submission.
    #[cfg(test)]
    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Validates the file picked in `input`. A rejected file is dropped and
    /// the input cleared so the user has to pick another one.
    pub fn handle_change_file(&mut self, input: &mut FileInput) -> Result<Accepted, Rejected> {
        let checked = match input.files.first() {
            None => Err(Rejected::Empty),
            Some(file) if is_accepted_mime(&file.mime_type) => Ok(file.clone()),
            Some(file) => Err(Rejected::UnsupportedType {
                file_name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            }),
        };

        match checked {
            Ok(file) => {
                info!(file = %file.name, "proof file accepted");
                let accepted = Accepted {
                    file_name: file.name.clone(),
                };
                self.file = Some(file);
                Ok(accepted)
            }
            Err(rejected) => {
                warn!(%rejected, "proof file rejected");
                input.clear();
                self.file = None;
                Err(rejected)
            }
        }
    }

    /// Sends the bill in the background and navigates to the bills list
    /// without waiting for the store. Must be called from within a tokio
    /// runtime.
    pub fn handle_submit(&self, event: &mut SubmitEvent) -> JoinHandle<SubmissionOutcome> {
        event.prevent_default();

        let email = self.email();
        let file_name = self.file.as_ref().map(|f| f.name.as_str());
        let bill = match bill_from_form(&event.form, email.clone(), file_name) {
            Ok(bill) => bill,
            // An incomplete form stays on the page: no store call and no
            // navigation, unlike a bill that the backend later rejects.
            Err(err) => {
                let outcome = SubmissionOutcome::Invalid(err);
                outcome.log();
                return tokio::spawn(async move { outcome });
            }
        };

        let upload = self.file.as_ref().map(|f| f.to_upload(email));
        let task = tokio::spawn(update_bill(self.store.clone(), bill, upload));

        // Not undone when the store rejects the bill.
        self.navigator.navigate(Route::Bills);

        task
    }

    fn email(&self) -> Option<String> {
        match storage::current_user(&*self.storage) {
            Ok(user) => user.and_then(|u| u.email),
            Err(err) => {
                warn!(error = %err, "unable to read session user");
                None
            }
        }
    }
}

async fn update_bill(
    store: Arc<dyn BillsRepository>,
    bill: Bill,
    upload: Option<Upload>,
) -> SubmissionOutcome {
    let outcome = match send(&*store, bill, upload).await {
        Ok(bill) => SubmissionOutcome::Stored(bill),
        Err(err) => SubmissionOutcome::Failed(err),
    };
    outcome.log();
    outcome
}

async fn send(
    store: &dyn BillsRepository,
    mut bill: Bill,
    upload: Option<Upload>,
) -> store::Result<Bill> {
    let selector = match upload {
        Some(upload) => {
            let stored = store.create(upload).await?;
            bill.file_url = Some(stored.file_url);
            Some(stored.key)
        }
        None => None,
    };

    store
        .update(UpdateRequest {
            selector,
            data: serde_json::to_string(&bill)?,
        })
        .await
}
