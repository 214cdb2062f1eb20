//! URL handling module for Product-Scraper
//!
//! This module builds the URL of each catalog page from a template and
//! resolves relative links (such as product images) against a page URL.

mod resolve;
mod template;

// Re-export main types and functions
pub use resolve::resolve_link;
pub use template::{PageTemplate, PAGE_PLACEHOLDER, PAGE_QUERY_PARAM};
