use bills_api::{Bill, BillStatus};

use super::{document, escape};
use crate::containers::filtered_bills;
use crate::core::{display_date, status_label};
use crate::router::Route;

fn section(index: usize, status: BillStatus, bills: &[Bill]) -> String {
    let cards: String = filtered_bills(bills, status)
        .iter()
        .map(|bill| {
            format!(
                r#"<div class="bill-card" id="open-bill{}"><div>{}</div><div>{}</div><div>{} €</div><div>{}</div></div>"#,
                escape(bill.id.as_deref().unwrap_or("")),
                escape(bill.email.as_deref().unwrap_or("")),
                escape(&bill.name),
                bill.amount,
                escape(&display_date(&bill.date)),
            )
        })
        .collect();

    format!(
        r#"<div class="bills-section" data-testid="status-bills-container{}"><h3>{} ({})</h3>{}</div>"#,
        index,
        status_label(status),
        filtered_bills(bills, status).len(),
        cards
    )
}

pub fn dashboard_ui(bills: &[Bill]) -> String {
    let content = format!(
        r#"<div class="content-title">Validations</div>{}{}{}<form method="post" action="/logout"><button type="submit" data-testid="layout-disconnect">Se déconnecter</button></form>"#,
        section(1, BillStatus::Pending, bills),
        section(2, BillStatus::Accepted, bills),
        section(3, BillStatus::Refused, bills),
    );

    document(Route::Dashboard, &content)
}
