use super::constants::{self, headers};
use super::models::{Asset, Collection, ContentType, Entry, Environment, EnvironmentInfo, Fields};
use super::resilience::{RateLimiter, RateLimiterStats, ResilienceConfig, RetryPolicy};
use super::store::ContentStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use uuid::Uuid;

/// Contentful Content Management API client bound to one space environment
#[derive(Clone)]
pub struct ContentfulClient {
    environment: Environment,
    environment_name: String,
    http_client: reqwest::Client,
    retry_policy: RetryPolicy,
    rate_limiter: RateLimiter, // shared by clones of this client
}

impl ContentfulClient {
    pub fn with_resilience(environment: Environment, resilience: ResilienceConfig) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("contentful-duplicate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            environment_name: environment.environment_id.clone(),
            environment,
            http_client,
            retry_policy: RetryPolicy::new(resilience.retry),
            rate_limiter: RateLimiter::new(resilience.rate_limit),
        })
    }

    pub fn rate_limiter_stats(&self) -> RateLimiterStats {
        self.rate_limiter.stats()
    }

    /// Fetch the environment resource and adopt its display name.
    ///
    /// Also serves as a connectivity and credentials check.
    pub async fn resolve_environment_name(&mut self) -> StoreResult<&str> {
        let env = &self.environment;
        let url = constants::environment_endpoint(&env.base_url, &env.space_id, &env.environment_id);
        let response = self.send(|| self.http_client.get(&url)).await?;
        let info: EnvironmentInfo = read_json(response, "Environment", &env.environment_id).await?;

        if !info.name.is_empty() {
            self.environment_name = info.name;
        }
        debug!("Resolved environment '{}' as '{}'", env.environment_id, self.environment_name);
        Ok(&self.environment_name)
    }

    /// Apply auth, headers, rate limiting and retries to a request.
    ///
    /// Every attempt, retries included, takes a token from the rate limiter.
    async fn send<F>(&self, request: F) -> StoreResult<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        self.retry_policy
            .execute(|| {
                let limiter = &self.rate_limiter;
                let builder = request()
                    .bearer_auth(&self.environment.access_token)
                    .header("Content-Type", headers::CONTENT_TYPE_CMA);
                async move {
                    limiter.acquire().await;
                    builder.send().await
                }
            })
            .await
    }

    fn entry_url(&self, id: &str) -> String {
        let env = &self.environment;
        constants::entry_endpoint(&env.base_url, &env.space_id, &env.environment_id, id)
    }

    fn require_version(entry: &Entry) -> StoreResult<u64> {
        entry.sys.version.ok_or_else(|| {
            StoreError::InvalidRequest(format!("entry '{}' has no sys.version", entry.sys.id))
        })
    }
}

#[async_trait]
impl ContentStore for ContentfulClient {
    fn environment_name(&self) -> &str {
        &self.environment_name
    }

    async fn get_entry(&self, id: &str) -> StoreResult<Entry> {
        let url = self.entry_url(id);
        let response = self.send(|| self.http_client.get(&url)).await?;
        read_json(response, "Entry", id).await
    }

    async fn get_asset(&self, id: &str) -> StoreResult<Asset> {
        let env = &self.environment;
        let url = constants::asset_endpoint(&env.base_url, &env.space_id, &env.environment_id, id);
        let response = self.send(|| self.http_client.get(&url)).await?;
        read_json(response, "Asset", id).await
    }

    async fn get_content_types(&self) -> StoreResult<Vec<ContentType>> {
        let env = &self.environment;
        let url = constants::content_types_endpoint(&env.base_url, &env.space_id, &env.environment_id);
        let limit = constants::CONTENT_TYPE_PAGE_LIMIT;
        let mut content_types = Vec::new();

        loop {
            let skip = content_types.len().to_string();
            let limit_param = limit.to_string();
            let response = self
                .send(|| {
                    self.http_client
                        .get(&url)
                        .query(&[("limit", limit_param.as_str()), ("skip", skip.as_str())])
                })
                .await?;
            let page: Collection<ContentType> = read_json(response, "ContentTypes", &env.environment_id).await?;

            let fetched = page.items.len();
            content_types.extend(page.items);

            let total = page.total.unwrap_or(content_types.len() as u64);
            if fetched < limit as usize || content_types.len() as u64 >= total {
                break;
            }
        }

        debug!("Loaded {} content types from '{}'", content_types.len(), self.environment_name);
        Ok(content_types)
    }

    /// Create an entry under a freshly generated id.
    ///
    /// The id is fixed before the first attempt, so a retried create can
    /// never produce a second entry. When an earlier attempt did land, the
    /// retry sees a version conflict and the existing entry is returned.
    async fn create_entry(&self, content_type_id: &str, fields: &Fields) -> StoreResult<Entry> {
        let id = Uuid::new_v4().simple().to_string();
        let url = self.entry_url(&id);
        let body = json!({ "fields": fields });

        let response = self
            .send(|| {
                self.http_client
                    .put(&url)
                    .header(headers::X_CONTENTFUL_CONTENT_TYPE, content_type_id)
                    .json(&body)
            })
            .await?;

        match read_json::<Entry>(response, "ContentType", content_type_id).await {
            Err(StoreError::VersionMismatch(_)) => {
                let existing = self.get_entry(&id).await?;
                if existing.content_type_id() != Some(content_type_id) {
                    return Err(StoreError::VersionMismatch(id));
                }
                debug!("Entry '{}' already created by an earlier attempt", id);
                Ok(existing)
            }
            result => result,
        }
    }

    async fn publish_entry(&self, entry: &Entry) -> StoreResult<Entry> {
        let version = Self::require_version(entry)?;
        let env = &self.environment;
        let url = constants::entry_published_endpoint(&env.base_url, &env.space_id, &env.environment_id, entry.id());

        let response = self
            .send(|| {
                self.http_client
                    .put(&url)
                    .header(headers::X_CONTENTFUL_VERSION, version.to_string())
            })
            .await?;
        read_json(response, "Entry", entry.id()).await
    }

    async fn update_entry(&self, entry: &Entry) -> StoreResult<Entry> {
        let version = Self::require_version(entry)?;
        let url = self.entry_url(entry.id());
        let body = json!({ "fields": entry.fields });

        let response = self
            .send(|| {
                self.http_client
                    .put(&url)
                    .header(headers::X_CONTENTFUL_VERSION, version.to_string())
                    .json(&body)
            })
            .await?;
        read_json(response, "Entry", entry.id()).await
    }
}

/// Decode a success body, or map the CMA error envelope onto [`StoreError`]
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    resource: &'static str,
    id: &str,
) -> StoreResult<T> {
    let status = response.status();
    let request_id = response
        .headers()
        .get(headers::X_CONTENTFUL_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let text = response.text().await?;

    if status.is_success() {
        return Ok(serde_json::from_str(&text)?);
    }

    let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
    let error_id = body["sys"]["id"].as_str().unwrap_or_default();
    let message = error_message(&body, &text);

    if let Some(request_id) = request_id {
        warn!("CMA request {} failed with {}: {}", request_id, status, message);
    }

    Err(match (status.as_u16(), error_id) {
        (404, _) | (_, "NotFound") => StoreError::not_found(resource, id),
        (409, _) | (_, "VersionMismatch") => StoreError::VersionMismatch(id.to_string()),
        (422, _) | (_, "ValidationFailed") | (_, "UnknownField") => StoreError::Validation(message),
        (status, _) => StoreError::Api { status, message },
    })
}

/// Message plus any validation details the CMA returned
fn error_message(body: &Value, raw: &str) -> String {
    let message = body["message"].as_str().unwrap_or(raw).to_string();
    match body["details"]["errors"].as_array() {
        Some(errors) if !errors.is_empty() => {
            let details: Vec<String> = errors
                .iter()
                .map(|error| {
                    let path = error["path"]
                        .as_array()
                        .map(|segments| {
                            segments
                                .iter()
                                .map(|s| s.as_str().map(str::to_string).unwrap_or_else(|| s.to_string()))
                                .collect::<Vec<_>>()
                                .join(".")
                        })
                        .unwrap_or_default();
                    let name = error["name"].as_str().unwrap_or("error");
                    format!("{} ({})", path, name)
                })
                .collect();
            format!("{}: {}", message, details.join(", "))
        }
        _ => message,
    }
}
