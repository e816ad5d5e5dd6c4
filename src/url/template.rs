use crate::url::parse_http_url;
use crate::UrlError;
use url::Url;

/// Placeholder substituted with the page number
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Seed URL template for a paginated listing
///
/// The template is an ordinary URL with a `{page}` placeholder somewhere in
/// it, typically as the value of a query parameter:
///
/// ```
/// use catalog_walker::url::PageUrlTemplate;
///
/// let template = PageUrlTemplate::parse("https://www.molex.com/en-us/products?page={page}").unwrap();
/// let url = template.url_for(7).unwrap();
/// assert_eq!(url.as_str(), "https://www.molex.com/en-us/products?page=7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrlTemplate {
    template: String,
}

impl PageUrlTemplate {
    /// Parses a template, checking that it has a placeholder and that the
    /// substituted URL is a valid HTTP(S) URL
    pub fn parse(template: &str) -> Result<Self, UrlError> {
        if !template.contains(PAGE_PLACEHOLDER) {
            return Err(UrlError::MissingPlaceholder(template.to_string()));
        }

        let parsed = Self {
            template: template.to_string(),
        };

        // Probe with the first page so a broken template fails at load time
        parsed.url_for(1)?;

        Ok(parsed)
    }

    /// Builds the URL of a listing page
    pub fn url_for(&self, page_number: u32) -> Result<Url, UrlError> {
        let url_str = self
            .template
            .replace(PAGE_PLACEHOLDER, &page_number.to_string());
        parse_http_url(&url_str)
    }

    /// Returns the raw template string
    pub fn as_str(&self) -> &str {
        &self.template
    }
}
