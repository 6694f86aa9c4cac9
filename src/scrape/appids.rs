// src/scrape/appids.rs

const NEEDLE: &str = "gamepage-appid-";

/// Every `gamepage-appid-<digits>"` in `text`, in order of appearance.
/// Duplicates are kept; the saved listing does not repeat ids.
pub fn extract_appids(text: &str) -> Vec<u32> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(NEEDLE) {
        rest = &rest[pos + NEEDLE.len()..];

        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (digits, after) = rest.split_at(digits_end);
        if digits.is_empty() || !after.starts_with('"') {
            continue;
        }
        if let Ok(id) = digits.parse() {
            out.push(id);
        }
    }
    out
}
