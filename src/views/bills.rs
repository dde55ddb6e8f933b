use bills_api::Bill;

use super::{document, escape};
use crate::core::{sorted_by_date, status_label};
use crate::router::Route;

fn row(bill: &Bill, date: &str) -> String {
    let eye = match &bill.file_url {
        Some(url) => format!(
            r#"<a data-testid="icon-eye" data-bill-url="{0}" href="{0}" target="_blank">Voir</a>"#,
            escape(url)
        ),
        None => String::new(),
    };

    format!(
        r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{} €</td><td>{}</td><td>{}</td></tr>"#,
        escape(bill.expense_type.label()),
        escape(&bill.name),
        escape(date),
        bill.amount,
        status_label(bill.status),
        eye,
    )
}

/// Rows ordered by displayed date, earliest first.
fn rows(bills: &[Bill]) -> String {
    sorted_by_date(bills)
        .iter()
        .map(|(date, bill)| row(bill, date))
        .collect()
}

pub fn bills_ui(bills: &[Bill]) -> String {
    let content = format!(
        r#"<div class="content-header"><div class="content-title">Mes notes de frais</div><form method="post" action="{}"><button type="submit" data-testid="btn-new-bill" class="btn btn-primary">Nouvelle note de frais</button></form></div><div id="data-table"><table id="example" class="table table-striped"><thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead><tbody data-testid="tbody">{}</tbody></table></div>"#,
        Route::Bills.path(),
        rows(bills)
    );

    document(Route::Bills, &content)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;
    use crate::store::fixtures;
    use crate::views::screen;

    fn date_pattern() -> Regex {
        Regex::new(r"^(19|20)\d\d[- /.](0[1-9]|1[012])[- /.](0[1-9]|[12][0-9]|3[01])$").unwrap()
    }

    #[test]
    fn bills_are_ordered_from_earliest_to_latest() {
        let html = bills_ui(&fixtures());

        let dates = screen::get_all_by_text(&html, &date_pattern());
        let mut sorted = dates.clone();
        sorted.sort();

        assert_eq!(dates.len(), 4);
        assert_eq!(dates, sorted);
        assert_eq!(dates[0], "2001-01-01");
    }

    #[test]
    fn dates_with_other_separators_are_normalized() {
        let mut bills = fixtures();
        bills[0].date = "2000/12/31".to_string();

        let html = bills_ui(&bills);
        let dates = screen::get_all_by_text(&html, &date_pattern());

        assert_eq!(dates[0], "2000-12-31");
    }

    #[test]
    fn renders_status_labels_and_proof_links() {
        let html = bills_ui(&fixtures());

        assert!(html.contains("En attente"));
        assert!(html.contains("Accepté"));
        assert_eq!(screen::get_all_by_test_id(&html, "icon-eye").len(), 4);
        assert!(screen::get_by_test_id(&html, "btn-new-bill").is_some());
    }

    #[test]
    fn empty_list_renders_empty_table() {
        let html = bills_ui(&[]);

        assert!(html.contains(r#"<tbody data-testid="tbody"></tbody>"#));
    }
}
