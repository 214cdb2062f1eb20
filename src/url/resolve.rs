use url::Url;

/// Resolves an href or src attribute to an absolute http(s) URL
///
/// Returns None if the link should be dropped:
/// - empty values and fragment-only anchors
/// - javascript:, mailto:, tel: and data: schemes
/// - values that do not resolve against the base URL
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use product_scraper::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/laptops?page=2").unwrap();
/// assert_eq!(
///     resolve_link("/images/cart2.png", &base).as_deref(),
///     Some("https://example.com/images/cart2.png")
/// );
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
