//! HTML extractor for product listings
//!
//! This module turns a catalog page body into [`ItemRecord`]s:
//! - Selectors from the configuration are compiled once
//! - Each item container yields at most one record, in document order
//! - Containers whose fields violate the record invariants are skipped

use crate::config::SelectorConfig;
use crate::record::{parse_price, parse_rating, parse_review_count, ItemRecord, RecordError};
use crate::url::resolve_link;
use crate::{ConfigError, ParseError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Selectors compiled from a [`SelectorConfig`]
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    item: Selector,
    name: Selector,
    name_attribute: Option<String>,
    price: Selector,
    description: Selector,
    rating: Selector,
    rating_attribute: Option<String>,
    reviews: Selector,
    image: Selector,
    image_attribute: String,
}

impl CompiledSelectors {
    /// Compiles every selector, failing on the first invalid one
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            item: compile_selector("item", &config.item)?,
            name: compile_selector("name", &config.name)?,
            name_attribute: non_empty_attribute(&config.name_attribute),
            price: compile_selector("price", &config.price)?,
            description: compile_selector("description", &config.description)?,
            rating: compile_selector("rating", &config.rating)?,
            rating_attribute: non_empty_attribute(&config.rating_attribute),
            reviews: compile_selector("reviews", &config.reviews)?,
            image: compile_selector("image", &config.image)?,
            image_attribute: config.image_attribute.trim().to_string(),
        })
    }
}

fn compile_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "{} selector cannot be empty",
            field
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", field, selector, e))
    })
}

fn non_empty_attribute(attribute: &Option<String>) -> Option<String> {
    attribute
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}

/// Extracts product listings from catalog pages
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: CompiledSelectors,
}

impl Extractor {
    /// Creates an extractor from the selector configuration
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: CompiledSelectors::compile(config)?,
        })
    }

    /// Parses a page body
    ///
    /// # Arguments
    ///
    /// * `body` - The HTML content of the page
    /// * `page_url` - The URL the body was fetched from, used to resolve image links
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractedPage)` - The parsed page; it may contain no listings
    /// * `Err(ParseError)` - The body is empty or contains no markup
    ///
    /// # Example
    ///
    /// ```
    /// use product_scraper::config::SelectorConfig;
    /// use product_scraper::crawler::Extractor;
    /// use url::Url;
    ///
    /// let html = r#"<div class="card-body">
    ///     <h4 class="price">$295.99</h4>
    ///     <a class="title" title="Asus VivoBook X441NA">Asus VivoBook...</a>
    /// </div>"#;
    /// let extractor = Extractor::new(&SelectorConfig::default()).unwrap();
    /// let page_url = Url::parse("https://example.com/laptops").unwrap();
    /// let page = extractor.parse(html, &page_url).unwrap();
    /// let records: Vec<_> = page.records().collect();
    /// assert_eq!(records[0].name(), "Asus VivoBook X441NA");
    /// assert_eq!(records[0].price(), Some(295.99));
    /// ```
    pub fn parse(&self, body: &str, page_url: &Url) -> Result<ExtractedPage<'_>, ParseError> {
        if body.trim().is_empty() {
            return Err(ParseError::EmptyBody {
                url: page_url.to_string(),
            });
        }

        if !body.contains('<') {
            return Err(ParseError::NotMarkup {
                url: page_url.to_string(),
            });
        }

        Ok(ExtractedPage {
            document: Html::parse_document(body),
            page_url: page_url.clone(),
            selectors: &self.selectors,
        })
    }
}

/// A parsed catalog page
pub struct ExtractedPage<'a> {
    document: Html,
    page_url: Url,
    selectors: &'a CompiledSelectors,
}

impl ExtractedPage<'_> {
    /// Returns the page's records lazily, in document order
    ///
    /// Each call starts a new pass over the document.
    pub fn records(&self) -> impl Iterator<Item = ItemRecord> + '_ {
        self.document
            .select(&self.selectors.item)
            .filter_map(move |container| match self.extract_record(container) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!("Skipping listing on {}: {}", self.page_url, e);
                    None
                }
            })
    }

    /// Number of item containers on the page, valid or not
    pub fn container_count(&self) -> usize {
        self.document.select(&self.selectors.item).count()
    }

    /// Builds one record from an item container
    fn extract_record(&self, container: ElementRef<'_>) -> Result<ItemRecord, RecordError> {
        let selectors = self.selectors;

        let name = first_match(container, &selectors.name)
            .map(|el| attribute_or_text(el, selectors.name_attribute.as_deref()))
            .unwrap_or_default();

        let price = match first_match(container, &selectors.price) {
            Some(el) => parse_price(&element_text(el))?,
            None => None,
        };

        let rating = first_match(container, &selectors.rating)
            .and_then(|el| parse_rating(&attribute_or_text(el, selectors.rating_attribute.as_deref())));

        let description = first_match(container, &selectors.description).map(element_text);

        let reviews = first_match(container, &selectors.reviews)
            .and_then(|el| parse_review_count(&element_text(el)));

        let image = first_match(container, &selectors.image)
            .and_then(|el| el.value().attr(&selectors.image_attribute))
            .and_then(|src| resolve_link(src, &self.page_url));

        ItemRecord::new(&name, price, rating, description, image, reviews)
    }
}

fn first_match<'a>(container: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    container.select(selector).next()
}

/// Text content with runs of whitespace collapsed to single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn attribute_or_text(element: ElementRef<'_>, attribute: Option<&str>) -> String {
    attribute
        .and_then(|name| element.value().attr(name))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| element_text(element))
}
