//! Queries over rendered markup, addressing elements by their test hooks.

use std::collections::HashMap;

use regex::Regex;

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub tag: String,
    pub attrs: HashMap<String, String>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

fn parse_attrs(raw: &str) -> HashMap<String, String> {
    let re = Regex::new(r#"([\w-]+)(?:="([^"]*)")?"#).unwrap();
    re.captures_iter(raw)
        .map(|c| {
            (
                c[1].to_string(),
                c.get(2).map(|v| v.as_str().to_string()).unwrap_or_default(),
            )
        })
        .collect()
}

/// Every opening tag carrying `data-testid="<id>"`.
pub(crate) fn get_all_by_test_id(html: &str, id: &str) -> Vec<Element> {
    let re = Regex::new(&format!(
        r#"<(\w+)((?:\s[^>]*)?\sdata-testid="{}"[^>]*)>"#,
        regex::escape(id)
    ))
    .unwrap();

    re.captures_iter(html)
        .map(|c| Element {
            tag: c[1].to_string(),
            attrs: parse_attrs(&c[2]),
        })
        .collect()
}

pub(crate) fn get_by_test_id(html: &str, id: &str) -> Option<Element> {
    get_all_by_test_id(html, id).into_iter().next()
}

/// Text nodes, in document order, whose trimmed content matches `pattern`.
pub(crate) fn get_all_by_text(html: &str, pattern: &Regex) -> Vec<String> {
    let text = Regex::new(r">([^<]+)<").unwrap();
    text.captures_iter(html)
        .map(|c| c[1].trim().to_string())
        .filter(|t| pattern.is_match(t))
        .collect()
}
