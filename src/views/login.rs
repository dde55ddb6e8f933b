use super::document;
use crate::router::Route;

fn login_form(test_id: &str, title: &str, user_type: &str) -> String {
    format!(
        r#"<form method="post" action="/login" data-testid="{}"><h2>{}</h2><input type="hidden" name="type" value="{}"/><label>Adresse email</label><input type="email" name="email" data-testid="{}-email-input" required/><button type="submit">Se connecter</button></form>"#,
        test_id, title, user_type, test_id
    )
}

pub fn login_ui() -> String {
    let content = format!(
        "{}{}",
        login_form("form-employee", "Employé", "Employee"),
        login_form("form-admin", "Administration", "Admin"),
    );

    document(Route::Login, &content)
}
