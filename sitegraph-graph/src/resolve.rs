//! Link resolution and origin handling.
//!
//! Raw links arrive exactly as the crawler scraped them: relative,
//! root-relative, protocol-relative, absolute or fragment-only. Everything is
//! resolved against the page it was found on and normalized through the `url`
//! crate, so a resolved link and a record url for the same page compare equal.

use crate::error::{LinkError, Result};
use std::collections::HashMap;
use url::{ParseError, Url};

/// A parsed page url together with its origin, computed once per page.
#[derive(Debug, Clone)]
pub struct PageBase {
    pub url: Url,
    /// `scheme://host[:port]`, `None` for opaque origins (`mailto:`, `data:` ...).
    pub origin: Option<String>,
    origin_url: Option<Url>,
}

impl PageBase {
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        let origin = origin_of(&url);
        let origin_url = origin.as_deref().and_then(|o| Url::parse(o).ok());
        Some(Self {
            url,
            origin,
            origin_url,
        })
    }
}

/// Per-run cache of parsed page urls.
///
/// Owned by whoever drives one batch (normally the graph builder) and dropped
/// with it; there is no global cache.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    pages: HashMap<String, Option<PageBase>>,
    hits: usize,
    misses: usize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `raw` as a page url, reusing an earlier parse of the same string.
    pub fn page(&mut self, raw: &str) -> Option<&PageBase> {
        if self.pages.contains_key(raw) {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.pages.insert(raw.to_string(), PageBase::parse(raw));
        }
        self.pages.get(raw).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Whether a resolved link stays on its source page's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    Internal,
    External,
}

/// ASCII origin (`scheme://host[:port]`) of a parsed url, if it has one.
pub fn origin_of(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

/// Origin of a raw url string; `None` if it does not parse or is opaque.
pub fn origin_of_str(raw: &str) -> Option<String> {
    Url::parse(raw.trim()).ok().as_ref().and_then(origin_of)
}

/// Normalized form used as the graph key for a page url.
///
/// Unparseable urls are kept verbatim (trimmed) so the page still becomes a
/// node; it simply never gets edges.
pub fn canonical_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.trim().to_string(),
    }
}

/// Resolve one raw link found on `page`.
pub fn resolve_link(link: &str, page: &PageBase) -> Result<Url> {
    let link = link.trim();
    if link.is_empty() {
        return Err(LinkError::Empty);
    }
    if link.starts_with('#') {
        return Err(LinkError::FragmentOnly(link.to_string()));
    }

    let resolved = if link.starts_with("//") {
        Url::parse(&format!("https:{}", link))
    } else if link.starts_with('/') {
        let Some(origin) = page.origin_url.as_ref() else {
            return Err(LinkError::NoOrigin(page.url.to_string()));
        };
        origin.join(link)
    } else {
        match Url::parse(link) {
            Err(ParseError::RelativeUrlWithoutBase) => page.url.join(link),
            other => other,
        }
    };

    let mut url = resolved.map_err(|source| LinkError::Malformed {
        link: link.to_string(),
        source,
    })?;
    url.set_fragment(None);
    Ok(url)
}

/// Internal iff both sides have a tuple origin and the origins are equal.
pub fn link_scope(target: &Url, page: &PageBase) -> LinkScope {
    match (origin_of(target), page.origin.as_ref()) {
        (Some(target_origin), Some(page_origin)) if &target_origin == page_origin => {
            LinkScope::Internal
        }
        _ => LinkScope::External,
    }
}

/// Non-empty path segments of a url.
///
/// Strings that do not parse as urls are treated as bare paths.
pub fn path_segments(url: &str) -> Vec<String> {
    let path = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// `host[:port]` of a url, the part used to group links by domain.
pub fn host_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> PageBase {
        PageBase::parse(url).unwrap()
    }

    #[test]
    fn test_fragment_only_is_rejected() {
        let base = page("https://example.com/docs/");
        assert!(matches!(
            resolve_link("#top", &base),
            Err(LinkError::FragmentOnly(_))
        ));
    }

    #[test]
    fn test_protocol_relative_uses_https() {
        let base = page("http://example.com/");
        let url = resolve_link("//cdn.example.com/app.js", &base).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/app.js");
    }

    #[test]
    fn test_root_relative_uses_origin() {
        let base = page("https://example.com:8443/a/b/c");
        let url = resolve_link("/x/y", &base).unwrap();
        assert_eq!(url.as_str(), "https://example.com:8443/x/y");
    }

    #[test]
    fn test_relative_uses_page_url() {
        let base = page("https://example.com/a/b/c");
        let url = resolve_link("d", &base).unwrap();
        assert_eq!(url.as_str(), "https://example.com/a/b/d");
    }

    #[test]
    fn test_absolute_strips_fragment() {
        let base = page("https://example.com/");
        let url = resolve_link("https://example.com/page#section", &base).unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_malformed_link_is_named_error() {
        let base = page("https://example.com/");
        assert!(matches!(
            resolve_link("http://[::1", &base),
            Err(LinkError::Malformed { .. })
        ));
    }

    #[test]
    fn test_scope_respects_port() {
        let base = page("https://example.com/");
        let other_port = Url::parse("https://example.com:8080/").unwrap();
        let same = Url::parse("https://example.com/about").unwrap();
        assert_eq!(link_scope(&other_port, &base), LinkScope::External);
        assert_eq!(link_scope(&same, &base), LinkScope::Internal);
    }

    #[test]
    fn test_cache_reuses_parses() {
        let mut cache = ResolutionCache::new();
        assert!(cache.page("https://example.com/").is_some());
        assert!(cache.page("https://example.com/").is_some());
        assert!(cache.page("not a url").is_none());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
    }
}
