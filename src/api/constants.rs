//! API constants for the Contentful Content Management API

/// Default CMA host
pub const DEFAULT_BASE_URL: &str = "https://api.contentful.com";

/// Page size used when listing content types (CMA maximum)
pub const CONTENT_TYPE_PAGE_LIMIT: u32 = 1000;

/// Standard headers for CMA requests
pub mod headers {
    /// Vendor JSON content type for management requests
    pub const CONTENT_TYPE_CMA: &str = "application/vnd.contentful.management.v1+json";

    /// Content type id for entry creation
    pub const X_CONTENTFUL_CONTENT_TYPE: &str = "X-Contentful-Content-Type";

    /// Optimistic locking version for updates and publishes
    pub const X_CONTENTFUL_VERSION: &str = "X-Contentful-Version";

    /// Seconds until the rate limit window resets (sent with 429)
    pub const X_CONTENTFUL_RATE_LIMIT_RESET: &str = "X-Contentful-RateLimit-Reset";

    /// Request id echoed by Contentful, useful when reporting errors
    pub const X_CONTENTFUL_REQUEST_ID: &str = "X-Contentful-Request-Id";
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// `{base}/spaces/{space}/environments/{env}`
pub fn environment_endpoint(base_url: &str, space_id: &str, environment_id: &str) -> String {
    format!(
        "{}/spaces/{}/environments/{}",
        base_url.trim_end_matches('/'),
        encode(space_id),
        encode(environment_id)
    )
}

pub fn entries_endpoint(base_url: &str, space_id: &str, environment_id: &str) -> String {
    format!("{}/entries", environment_endpoint(base_url, space_id, environment_id))
}

pub fn entry_endpoint(base_url: &str, space_id: &str, environment_id: &str, id: &str) -> String {
    format!("{}/{}", entries_endpoint(base_url, space_id, environment_id), encode(id))
}

pub fn entry_published_endpoint(
    base_url: &str,
    space_id: &str,
    environment_id: &str,
    id: &str,
) -> String {
    format!("{}/published", entry_endpoint(base_url, space_id, environment_id, id))
}

pub fn asset_endpoint(base_url: &str, space_id: &str, environment_id: &str, id: &str) -> String {
    format!(
        "{}/assets/{}",
        environment_endpoint(base_url, space_id, environment_id),
        encode(id)
    )
}

pub fn content_types_endpoint(base_url: &str, space_id: &str, environment_id: &str) -> String {
    format!("{}/content_types", environment_endpoint(base_url, space_id, environment_id))
}
