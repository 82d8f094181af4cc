/// Collapse every run of whitespace (spaces, tabs, newlines) into a single
/// space and strip the ends. Idempotent; scraped page text goes through
/// this before chunking.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
