//! HTML templates. Every function here is a pure function from data to
//! markup; interactive elements carry a `data-testid` hook.

mod bills;
mod dashboard;
mod error;
mod layout;
mod login;
mod new_bill;

pub use bills::bills_ui;
pub use dashboard::dashboard_ui;
pub use error::error_page;
pub use layout::document;
#[cfg(test)]
pub use layout::ACTIVE_ICON;
pub use login::login_ui;
pub use new_bill::new_bill_ui;

/// Escapes text for use in element content and quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod screen;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b class="x">Tom & 'Jerry'</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
