//! Extraction of `<meta>` tags and the page title from fetched HTML.
//!
//! This is a tolerant tag scanner rather than a full HTML parser: it only
//! needs the head metadata that link-preview cards are built from.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Head metadata of a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// Meta tag values keyed by lowercased `property` or `name`.
    pub tags: BTreeMap<String, String>,
    /// Text of the `<title>` element, trimmed.
    pub title: String,
}

impl PageMeta {
    /// Look up a meta value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

fn meta_tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<meta\b((?:"[^"]*"|'[^']*'|[^'">])*)>"#).ok())
        .as_ref()
}

fn attribute_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).ok()
    })
    .as_ref()
}

fn title_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").ok())
        .as_ref()
}

/// Parse meta tags and the title out of an HTML document.
///
/// A tag contributes when it has a non-empty `property` (preferred) or `name`
/// and a `content` attribute. Keys are lowercased and trimmed, values trimmed;
/// when a key repeats, the last tag wins. Character references in values and
/// the title are decoded.
///
/// # Examples
///
/// ```
/// use site_publisher::prebuild::parse_page_meta;
///
/// let meta = parse_page_meta(
///     r#"<head><title> Home </title><meta property="og:title" content="Hello &amp; welcome"></head>"#,
/// );
/// assert_eq!(meta.title, "Home");
/// assert_eq!(meta.get("og:title"), Some("Hello & welcome"));
/// ```
#[must_use]
pub fn parse_page_meta(html: &str) -> PageMeta {
    let mut meta = PageMeta::default();
    let (Some(meta_re), Some(title_re)) = (meta_tag_regex(), title_regex()) else {
        return meta;
    };

    for tag in meta_re.captures_iter(html) {
        let Some(attrs) = tag.get(1) else { continue };
        let attrs = parse_attributes(attrs.as_str());

        let key = attrs
            .get("property")
            .filter(|value| !value.is_empty())
            .or_else(|| attrs.get("name").filter(|value| !value.is_empty()));
        let content = attrs.get("content").filter(|value| !value.is_empty());

        if let (Some(key), Some(content)) = (key, content) {
            meta.tags
                .insert(key.trim().to_lowercase(), content.trim().to_owned());
        }
    }

    if let Some(title) = title_re.captures(html).and_then(|c| c.get(1)) {
        meta.title = decode_entities(title.as_str()).trim().to_owned();
    }

    meta
}

/// Parse `key=value` pairs from the inside of a tag. Keys are lowercased;
/// later duplicates win.
fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    let Some(re) = attribute_regex() else {
        return BTreeMap::new();
    };
    re.captures_iter(raw)
        .filter_map(|c| {
            let key = c.get(1)?.as_str().to_lowercase();
            let value = c.get(2).or_else(|| c.get(3)).or_else(|| c.get(4))?;
            Some((key, decode_entities(value.as_str())))
        })
        .collect()
}

/// Decode the character references that appear in head metadata.
///
/// Named references outside the basic XML set are left as written.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        let (before, from_amp) = rest.split_at(start);
        decoded.push_str(before);

        let reference = from_amp
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| from_amp.get(1..end).map(|name| (name, end)));

        match reference.and_then(|(name, end)| decode_reference(name).map(|c| (c, end))) {
            Some((c, end)) => {
                decoded.push(c);
                rest = from_amp.get(end + 1..).unwrap_or_default();
            }
            None => {
                decoded.push('&');
                rest = from_amp.get(1..).unwrap_or_default();
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
