//! Plain data stand-ins for the browser elements and events the controllers
//! act on. The web server fills them from HTTP requests; tests build them
//! directly.

use std::collections::HashMap;

use bills_api::Upload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: &str, mime_type: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_vec(),
        }
    }

    pub fn to_upload(&self, email: Option<String>) -> Upload {
        Upload {
            file_name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            email,
            content: self.content.clone(),
        }
    }
}

/// State of an `<input type="file">` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    pub files: Vec<SelectedFile>,
    pub value: String,
}

impl FileInput {
    /// Simulates a user picking `file`; browsers expose a fake path as value.
    pub fn select(file: SelectedFile) -> Self {
        Self {
            value: format!("C:\\fakepath\\{}", file.name),
            files: vec![file],
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.value.clear();
    }
}

/// Raw values of the new bill form, keyed by their test-hook identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.to_string());
    }

    /// Trimmed value of `key`, empty when the field is missing.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(|v| v.trim()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmitEvent {
    pub form: FormData,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: FormData) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_file_sets_fake_path() {
        let input = FileInput::select(SelectedFile::new("test.jpg", "image/jpg", b"test"));

        assert_eq!(input.value, "C:\\fakepath\\test.jpg");
        assert_eq!(input.files[0].name, "test.jpg");
    }

    #[test]
    fn clearing_drops_files_and_value() {
        let mut input = FileInput::select(SelectedFile::new("test.pdf", "application/pdf", b""));
        input.clear();

        assert_eq!(input, FileInput::default());
    }

    #[test]
    fn form_values_are_trimmed() {
        let form = FormData::new().with("amount", " 42 ");

        assert_eq!(form.get("amount"), "42");
        assert_eq!(form.get("vat"), "");
    }
}
