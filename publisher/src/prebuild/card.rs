//! Link-preview cards built from page metadata.

use super::meta::PageMeta;
use super::projects::Project;
use serde::{Deserialize, Serialize};
use url::Url;

/// Card type used when the page declares none but has an image.
pub const LARGE_IMAGE_CARD: &str = "summary_large_image";
/// Card type used when the page declares none and has no image.
pub const SUMMARY_CARD: &str = "summary";

/// A Twitter/X style preview card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Card {
    /// Card type, or empty for a fallback card.
    #[serde(rename = "type")]
    pub kind: String,
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Absolute image URL, or empty.
    pub image: String,
    /// The `twitter:site` handle, or empty.
    pub site: String,
    /// Why the page could not be fetched, when it could not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Card {
    /// The card used for projects without a URL, or whose page could not be
    /// fetched: title and description come from the project itself.
    #[must_use]
    pub fn fallback(project: &Project) -> Self {
        Self {
            title: project.name_or_empty().to_owned(),
            description: project.description_or_empty().to_owned(),
            ..Self::default()
        }
    }
}

/// Build a card for the page at `page_url` from its metadata.
///
/// Twitter tags take precedence over Open Graph tags, which take precedence
/// over the fallbacks. A relative image is resolved against `page_url`.
///
/// # Examples
///
/// ```
/// use site_publisher::prebuild::{build_card, parse_page_meta};
///
/// let meta = parse_page_meta(r#"<meta property="og:image" content="/card.png">"#);
/// let card = build_card("https://example.com/project/", &meta, "Project", "");
/// assert_eq!(card.kind, "summary_large_image");
/// assert_eq!(card.image, "https://example.com/card.png");
/// assert_eq!(card.title, "Project");
/// ```
#[must_use]
pub fn build_card(page_url: &str, meta: &PageMeta, title_fallback: &str, description_fallback: &str) -> Card {
    let title = first_of(meta, &["twitter:title", "og:title"]).unwrap_or(title_fallback);
    let description = first_of(meta, &["twitter:description", "og:description", "description"])
        .unwrap_or(description_fallback);
    let image = first_of(meta, &["twitter:image", "og:image"])
        .map(|image| resolve_url(page_url, image))
        .unwrap_or_default();

    let kind = match meta.get("twitter:card").filter(|kind| !kind.is_empty()) {
        Some(kind) => kind.to_owned(),
        None if image.is_empty() => SUMMARY_CARD.to_owned(),
        None => LARGE_IMAGE_CARD.to_owned(),
    };

    Card {
        kind,
        title: title.to_owned(),
        description: description.to_owned(),
        image,
        site: meta.get("twitter:site").unwrap_or_default().to_owned(),
        error: None,
    }
}

fn first_of<'m>(meta: &'m PageMeta, keys: &[&str]) -> Option<&'m str> {
    keys.iter()
        .find_map(|key| meta.get(key).filter(|value| !value.is_empty()))
}

/// Resolve `candidate` against `base`. Unresolvable input is kept as written.
fn resolve_url(base: &str, candidate: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(candidate))
        .map_or_else(|_| candidate.to_owned(), String::from)
}
