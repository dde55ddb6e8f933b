use std::io::Write;

use anyhow::Result;
use bills_api::Bill;
use tabwriter::TabWriter;

use crate::core::{sorted_by_date, status_label};

/// Writes `bills` as a table, earliest first.
pub fn print_bills<T: std::io::Write>(wr: T, bills: &[Bill]) -> Result<()> {
    let mut tw = TabWriter::new(wr);
    writeln!(tw, "Date\tType\tName\tAmount\tStatus\tID")?;

    for (date, bill) in sorted_by_date(bills) {
        writeln!(
            tw,
            "{}\t{}\t{}\t{:.2}\t{}\t{}",
            date,
            bill.expense_type,
            bill.name,
            bill.amount,
            status_label(bill.status),
            bill.id.as_deref().unwrap_or("-"),
        )?;
    }

    tw.flush()?;

    Ok(())
}
