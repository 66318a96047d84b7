//! HTML helper functions

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref ENTITY_RE: Regex = Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Decode the character references WordPress puts in rendered fields
///
/// Unknown named entities are left untouched.
pub fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body
                .strip_prefix("#x")
                .or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };

            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "hellip" => '…',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        _ => return None,
    })
}

/// Plain text from a rendered WordPress field
pub fn to_plain_text(rendered: &str) -> String {
    let text = decode_entities(&strip_html(rendered));
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `count` words, appending `omission` when anything was cut
pub fn truncate_words(s: &str, count: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");
    let words: Vec<&str> = s.split_whitespace().collect();

    if words.len() <= count {
        words.join(" ")
    } else {
        format!("{}{}", words[..count].join(" "), omission)
    }
}
