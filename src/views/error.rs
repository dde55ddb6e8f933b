use super::{document, escape};
use crate::router::Route;

pub fn error_page(route: Route, message: &str) -> String {
    let content = format!(
        r#"<div class="content-header"><div class="content-title">Erreur</div></div><div data-testid="error-message">{}</div>"#,
        escape(message)
    );

    document(route, &content)
}
