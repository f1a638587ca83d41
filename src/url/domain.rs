use url::Url;

/// Extracts the hostname from a URL
///
/// This function retrieves the host portion of a URL and converts it to
/// lowercase. The hostname is the key used for filtering, the same-site
/// restriction, and secret grouping, so every caller goes through here.
///
/// # Arguments
///
/// * `url` - The URL to extract the hostname from
///
/// # Returns
///
/// * `Some(String)` - The lowercase hostname
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use spinneret::url::extract_hostname;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_hostname(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_hostname(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_hostname(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_hostname(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
