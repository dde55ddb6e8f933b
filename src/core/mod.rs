mod bill;
mod file;

pub use bill::{
    bill_from_form, display_date, field, sorted_by_date, status_label, FormError, DEFAULT_PCT,
};
pub use file::{is_accepted_mime, ACCEPTED_MIME_TYPES};
