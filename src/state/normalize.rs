use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Element categories worth showing to the model. A hierarchy line survives
/// normalization only if it mentions one of these.
pub const CATEGORY_MARKERS: [&str; 5] = [
    "Button",
    "StaticText",
    "TextField",
    "SecureTextField",
    "Image",
];

pub const PREVIEW_LIMIT: usize = 500;
pub const TRUNCATION_MARKER: &str = "...(truncated)";

fn address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"0x[0-9a-fA-F]+").expect("static address regex"))
}

pub fn is_interactive_line(line: &str) -> bool {
    CATEGORY_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Strip memory-address tokens such as `0x600003f1c000`.
///
/// Removing a token can splice its neighbours into a new one (`00x1x1`), so
/// this repeats until a pass changes nothing.
pub fn redact_addresses(line: &str) -> String {
    let mut current = line.to_string();
    loop {
        match address_pattern().replace_all(&current, "") {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => current = next,
        }
    }
}

/// Reduce a raw hierarchy dump to the interactive/textual lines, in order,
/// with addresses redacted. Pure filter: never invents or reorders lines.
pub fn normalize_hierarchy(raw: &str) -> String {
    raw.lines()
        .filter(|line| is_interactive_line(line))
        .map(redact_addresses)
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `limit` characters of the hierarchy for step logs.
pub fn hierarchy_preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();

    if chars.next().is_some() {
        format!("{}{}", head, TRUNCATION_MARKER)
    } else {
        head
    }
}

pub fn hierarchy_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
