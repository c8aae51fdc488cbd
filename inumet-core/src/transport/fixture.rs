//! Canned responses for working without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{InumetError, Result};

use super::Transport;

/// Serves pre-registered JSON documents keyed by url.
///
/// Every url requested is recorded, so callers can assert on the traffic a
/// client produced.
#[derive(Debug, Clone, Default)]
pub struct FixtureTransport {
    documents: HashMap<String, serde_json::Value>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.documents.insert(url.into(), body);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: serde_json::Value) {
        self.documents.insert(url.into(), body);
    }

    /// Urls requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| InumetError::Api {
                status: 404,
                url: url.to_string(),
                body: "no fixture registered".to_string(),
            })
    }
}
