use crate::UrlError;
use url::Url;

/// Placeholder replaced by the page number in a URL template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Query parameter set on templates without a placeholder
pub const PAGE_QUERY_PARAM: &str = "page";

/// Builds the URL of catalog page N
///
/// A template containing `{page}` has the placeholder substituted. Any other
/// template is treated as a base URL and gets a `page=N` query parameter,
/// replacing an existing one.
///
/// # Examples
///
/// ```
/// use product_scraper::url::PageTemplate;
///
/// let template = PageTemplate::new("https://example.com/laptops?page={page}").unwrap();
/// assert_eq!(template.page_url(3).unwrap().as_str(), "https://example.com/laptops?page=3");
///
/// let template = PageTemplate::new("https://example.com/laptops").unwrap();
/// assert_eq!(template.page_url(2).unwrap().as_str(), "https://example.com/laptops?page=2");
/// ```
#[derive(Debug, Clone)]
pub struct PageTemplate {
    template: String,
}

impl PageTemplate {
    /// Validates a template by rendering its first page
    pub fn new(template: &str) -> Result<Self, UrlError> {
        let template = template.trim().to_string();
        let page_template = Self { template };

        let rendered = page_template.render(1);
        let url = Url::parse(&rendered).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingDomain);
        }

        Ok(page_template)
    }

    /// Returns true if the template carries an explicit `{page}` placeholder
    pub fn has_placeholder(&self) -> bool {
        self.template.contains(PAGE_PLACEHOLDER)
    }

    /// Returns the raw template string
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Returns the URL of the given page
    pub fn page_url(&self, page: u32) -> Result<Url, UrlError> {
        Url::parse(&self.render(page)).map_err(|e| UrlError::Parse(e.to_string()))
    }

    fn render(&self, page: u32) -> String {
        if self.has_placeholder() {
            return self.template.replace(PAGE_PLACEHOLDER, &page.to_string());
        }

        let Ok(mut url) = Url::parse(&self.template) else {
            return self.template.clone();
        };

        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PAGE_QUERY_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &retained {
                pairs.append_pair(key, value);
            }
            pairs.append_pair(PAGE_QUERY_PARAM, &page.to_string());
        }

        url.to_string()
    }
}
