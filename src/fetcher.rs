//! Resource Fetcher - HTTP access to the Star Wars API

use crate::entity::Entity;
use crate::error::{EchoError, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Source of SWAPI resources.
///
/// Implementations:
/// - SwapiClient: live HTTP lookups
/// - test doubles serving canned JSON
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// GET `url` with optional query parameters and decode the JSON body
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Value>;

    /// Base URL of the API, without trailing slash
    fn endpoint(&self) -> &str;

    /// Search `resource` (e.g. "planets", "people") and return the first match.
    async fn search_first(&self, resource: &str, term: &str) -> Result<Entity> {
        let url = format!("{}/{}/", self.endpoint(), resource);
        let response = self.get(&url, &[("search", term)]).await?;

        response
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| EchoError::NoSearchResults {
                resource: resource.to_string(),
                term: term.to_string(),
            })
    }
}

pub struct SwapiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SwapiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResourceFetcher for SwapiClient {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {} {:?}", url, params);

        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EchoError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned resources keyed by URL, and search results keyed by
    /// `resource/term`. Records every request.
    #[derive(Default)]
    pub struct FixtureFetcher {
        pub resources: HashMap<String, Value>,
        pub searches: HashMap<String, Value>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FixtureFetcher {
        pub fn with_resource(mut self, url: &str, value: Value) -> Self {
            self.resources.insert(url.to_string(), value);
            self
        }

        pub fn with_search(mut self, resource: &str, term: &str, value: Value) -> Self {
            self.searches.insert(format!("{}/{}", resource, term), value);
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResourceFetcher for FixtureFetcher {
        async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
            self.requests.lock().unwrap().push(url.to_string());

            let search = params.iter().find(|(k, _)| *k == "search").map(|(_, v)| *v);
            if let Some(term) = search {
                let resource = url
                    .trim_start_matches(self.endpoint())
                    .trim_matches('/');
                let hit = self.searches.get(&format!("{}/{}", resource, term));
                return Ok(serde_json::json!({
                    "count": hit.map_or(0, |_| 1),
                    "results": hit.cloned().into_iter().collect::<Vec<_>>(),
                }));
            }

            self.resources.get(url).cloned().ok_or(EchoError::Status {
                url: url.to_string(),
                status: 404,
            })
        }

        fn endpoint(&self) -> &str {
            "https://swapi.test/api"
        }
    }
}
