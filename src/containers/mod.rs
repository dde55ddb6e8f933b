//! Controllers bound to the rendered views.

mod bills;
mod dashboard;
mod new_bill;

pub use bills::Bills;
pub use dashboard::{filtered_bills, Dashboard};
pub use new_bill::NewBill;
#[cfg(test)]
pub use new_bill::SubmissionOutcome;
