/// MIME types a proof file may have.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpg", "image/jpeg", "image/png"];

pub fn is_accepted_mime(mime: &str) -> bool {
    let mime = mime.trim();
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime))
}
