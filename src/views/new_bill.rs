use bills_api::ExpenseType;

use super::document;
use crate::core::{field, ACCEPTED_MIME_TYPES, DEFAULT_PCT};
use crate::router::Route;

pub fn new_bill_ui() -> String {
    let options: String = ExpenseType::ALL
        .iter()
        .map(|ty| format!("<option>{}</option>", ty.label()))
        .collect();

    let content = format!(
        r#"<div class="content-header"><div class="content-title">Envoyer une note de frais</div></div>
<form data-testid="form-new-bill" method="post" action="{action}" enctype="multipart/form-data">
<label for="{ty}">Type de dépense</label><select required name="{ty}" data-testid="{ty}">{options}</select>
<label for="{name}">Nom de la dépense</label><input type="text" name="{name}" data-testid="{name}" placeholder="Vol Paris Londres"/>
<label for="{date}">Date</label><input required type="date" name="{date}" data-testid="{date}"/>
<label for="{amount}">Montant TTC</label><input required type="number" name="{amount}" data-testid="{amount}" placeholder="348"/>
<label for="{vat}">TVA</label><input type="number" name="{vat}" data-testid="{vat}" placeholder="70"/>
<input type="number" name="{pct}" data-testid="{pct}" placeholder="{default_pct}"/>
<label for="{commentary}">Commentaire</label><textarea name="{commentary}" data-testid="{commentary}" rows="3"></textarea>
<label for="{file}">Justificatif</label><input required type="file" name="{file}" accept="{accept}" data-testid="{file}"/>
<button type="submit" id="btn-send-bill" class="btn btn-primary">Envoyer</button>
</form>"#,
        action = Route::NewBill.path(),
        ty = field::EXPENSE_TYPE,
        options = options,
        name = field::NAME,
        date = field::DATE,
        amount = field::AMOUNT,
        vat = field::VAT,
        pct = field::PCT,
        default_pct = DEFAULT_PCT,
        commentary = field::COMMENTARY,
        file = field::FILE,
        accept = ACCEPTED_MIME_TYPES.join(","),
    );

    document(Route::NewBill, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::screen;

    #[test]
    fn form_is_rendered() {
        let html = new_bill_ui();

        let form = screen::get_by_test_id(&html, "form-new-bill").unwrap();
        assert_eq!(form.tag, "form");
        assert_eq!(form.attr("enctype"), Some("multipart/form-data"));
    }

    #[test]
    fn all_form_fields_are_rendered() {
        let html = new_bill_ui();

        for id in [
            "expense-type",
            "expense-name",
            "datepicker",
            "amount",
            "vat",
            "pct",
            "commentary",
            "file",
        ] {
            assert!(screen::get_by_test_id(&html, id).is_some(), "{}", id);
        }
    }

    #[test]
    fn offers_every_expense_type() {
        let html = new_bill_ui();

        for ty in ExpenseType::ALL {
            assert!(html.contains(&format!("<option>{}</option>", ty.label())));
        }
    }
}
