//! Text cleanup for scraped pages. Pure transform, no I/O.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg)\b.*?</(script|style|noscript|svg)\s*>")
        .expect("static regex")
});
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*?>").expect("static regex"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// Strip markup noise from a raw page and cap it to `max_chars` characters.
///
/// Removes script/style blocks, comments, tags and bare URLs, decodes the handful of
/// entities that show up in job copy, and collapses all whitespace to single spaces.
pub fn clean_text(raw: &str, max_chars: usize) -> String {
    let text = SCRIPT_STYLE.replace_all(raw, " ");
    let text = COMMENT.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = URL.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    truncate_chars(text.trim(), max_chars)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Truncate on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_strips_markup() {
        let raw = r#"<html><head><style>.a{color:red}</style><script>var x = 1;</script></head>
            <body><!-- nav --><h1>Careers</h1>
            <p>Senior&nbsp;Backend Engineer &amp; SRE</p>
            <a href="https://example.com/apply">Apply at https://example.com/apply</a></body></html>"#;

        let out = clean_text(raw, 10_000);
        assert_eq!(out, "Careers Senior Backend Engineer & SRE Apply at");
    }

    #[test]
    fn test_clean_text_caps_length_on_char_boundary() {
        let out = clean_text("héllo wörld", 7);
        assert_eq!(out, "héllo w");
        assert_eq!(clean_text("short", 100), "short");
    }

    #[test]
    fn test_clean_text_empty_page() {
        assert_eq!(clean_text("<div>   </div>", 100), "");
    }
}
