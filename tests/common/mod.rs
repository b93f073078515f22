//! Offline SWAPI double backed by tests/fixtures/swapi_resources.json
#![allow(dead_code)]

use async_trait::async_trait;
use echo_base::{EchoError, ResourceFetcher, Result};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Mutex;

pub const ENDPOINT: &str = "https://swapi.test/api";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

pub struct FakeSwapi {
    resources: Value,
    searches: Value,
    pub requests: Mutex<Vec<String>>,
}

impl FakeSwapi {
    pub fn load() -> Self {
        let fixtures: Value = serde_json::from_str(include_str!("../fixtures/swapi_resources.json"))
            .expect("swapi_resources.json is valid JSON");
        Self {
            resources: fixtures["resources"].clone(),
            searches: fixtures["searches"].clone(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ResourceFetcher for FakeSwapi {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some((_, term)) = params.iter().find(|(k, _)| *k == "search") {
            let resource = url.trim_start_matches(ENDPOINT).trim_matches('/');
            let results: Vec<Value> = self
                .searches
                .get(format!("{}/{}", resource, term))
                .cloned()
                .into_iter()
                .collect();
            return Ok(json!({"count": results.len(), "results": results}));
        }

        self.resources.get(url).cloned().ok_or(EchoError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    fn endpoint(&self) -> &str {
        ENDPOINT
    }
}
