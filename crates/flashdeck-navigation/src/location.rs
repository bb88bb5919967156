//! Page addresses
//!
//! Navigable form: `origin/<slugOrId>[?id=<id>][&lang=<code>][&fullscreen=true]`

use flashdeck_catalog::CatalogEntry;
use percent_encoding::percent_decode_str;
use url::Url;

/// What a page address asks for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    /// First path segment below the site origin, percent-decoded
    pub key: Option<String>,
    /// `id` query parameter
    pub id: Option<String>,
    /// `lang` query parameter, lower-cased
    pub language: Option<String>,
    pub fullscreen: bool,
}

impl PageLocation {
    pub fn from_url(url: &Url, origin: &Url) -> Self {
        let path = url.path();
        let relative = path.strip_prefix(origin.path()).unwrap_or(path);

        let key = relative
            .split('/')
            .find(|segment| !segment.is_empty())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().trim().to_string())
            .filter(|segment| !segment.is_empty() && !is_index_page(segment));

        let mut location = Self {
            key,
            ..Self::default()
        };

        for (name, value) in url.query_pairs() {
            let value = value.trim();
            match name.as_ref() {
                "id" if !value.is_empty() => location.id = Some(value.to_string()),
                "lang" if !value.is_empty() => location.language = Some(value.to_ascii_lowercase()),
                "fullscreen" => location.fullscreen = matches!(value, "true" | "1"),
                _ => {}
            }
        }

        location
    }

    /// Parse an address; relative ones are taken against `origin`
    pub fn parse(address: &str, origin: &Url) -> Result<Self, url::ParseError> {
        let url = origin.join(address.trim())?;
        Ok(Self::from_url(&url, origin))
    }

    /// Neither a path key nor an id
    pub fn is_home(&self) -> bool {
        self.key.is_none() && self.id.is_none()
    }
}

fn is_index_page(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    lower == "index.html" || lower == "index.htm"
}

/// Address shown for an entry: `origin/<slug>?id=<id>[&lang=<code>]`
pub fn canonical_url(origin: &Url, entry: &CatalogEntry, language: Option<&str>) -> Url {
    let mut url = origin.clone();
    url.set_query(None);
    url.set_fragment(None);

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&entry.slug());
    }

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("id", &entry.id);
        if let Some(language) = language {
            query.append_pair("lang", language);
        }
    }

    url
}
