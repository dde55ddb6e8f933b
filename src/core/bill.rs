use bills_api::{Bill, BillStatus, ExpenseType};
use chrono::NaiveDate;
use thiserror::Error;

use crate::dom::FormData;

/// Percent of salary assumed when the field is left empty.
pub const DEFAULT_PCT: u32 = 20;

/// Test-hook identifiers of the new bill form fields.
pub mod field {
    pub const EXPENSE_TYPE: &str = "expense-type";
    pub const NAME: &str = "expense-name";
    pub const DATE: &str = "datepicker";
    pub const AMOUNT: &str = "amount";
    pub const VAT: &str = "vat";
    pub const PCT: &str = "pct";
    pub const COMMENTARY: &str = "commentary";
    pub const FILE: &str = "file";
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y %m %d"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("field {0} is required")]
    Missing(&'static str),
    #[error("unknown expense type {0:?}")]
    ExpenseType(String),
    #[error("field {field} is not a valid {expected}: {value:?}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

fn required<'a>(form: &'a FormData, key: &'static str) -> Result<&'a str, FormError> {
    match form.get(key) {
        "" => Err(FormError::Missing(key)),
        value => Ok(value),
    }
}

fn number(form: &FormData, key: &'static str) -> Result<f64, FormError> {
    let value = required(form, key)?;
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| FormError::Invalid {
            field: key,
            expected: "number",
            value: value.to_string(),
        })
}

/// Builds a pending bill out of the raw form values.
pub fn bill_from_form(
    form: &FormData,
    email: Option<String>,
    file_name: Option<&str>,
) -> Result<Bill, FormError> {
    let ty = required(form, field::EXPENSE_TYPE)?;
    let expense_type =
        ExpenseType::from_label(ty).ok_or_else(|| FormError::ExpenseType(ty.to_string()))?;

    let date = required(form, field::DATE)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormError::Invalid {
        field: field::DATE,
        expected: "date",
        value: date.to_string(),
    })?;

    let pct = match form.get(field::PCT) {
        "" => DEFAULT_PCT,
        value => value.parse::<u32>().map_err(|_| FormError::Invalid {
            field: field::PCT,
            expected: "percentage",
            value: value.to_string(),
        })?,
    };

    Ok(Bill {
        id: None,
        email,
        expense_type,
        name: required(form, field::NAME)?.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        amount: number(form, field::AMOUNT)?,
        vat: number(form, field::VAT)?,
        pct,
        commentary: form.get(field::COMMENTARY).to_string(),
        file_url: None,
        file_name: file_name.map(str::to_string),
        status: BillStatus::Pending,
    })
}

/// Renders a bill date as `YYYY-MM-DD`, or as-is when it cannot be parsed.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Pairs each bill with its displayed date, earliest first.
pub fn sorted_by_date(bills: &[Bill]) -> Vec<(String, &Bill)> {
    let mut dated: Vec<(String, &Bill)> =
        bills.iter().map(|b| (display_date(&b.date), b)).collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0));
    dated
}

pub fn status_label(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refused",
    }
}
