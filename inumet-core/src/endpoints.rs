//! Resource discovery.
//!
//! INUMET publishes one bootstrap document listing every data resource by
//! name together with its path. All other requests look their path up here,
//! so the client keeps working when the service moves files around.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{InumetError, Result};

/// Path of the bootstrap document, relative to the base url.
pub const RESOURCES_PATH: &str = "android/info_recursosV5.json";

pub const STATIONS: &str = "estaciones";
pub const ZONES: &str = "zonas";
pub const DEPARTMENTS: &str = "departamentos";
pub const CURRENT: &str = "estadoactual";
pub const FORECAST: &str = "pronosticoV2";
pub const ALERTS: &str = "nivelRiesgoV2";
pub const LEGACY_FORECAST: &str = "pronostico";
pub const LEGACY_ALERTS: &str = "nivelRiesgo";

#[derive(Debug, Deserialize)]
struct ResourcesDocument {
    info_recursos: Vec<ResourceEntry>,
}

#[derive(Debug, Deserialize)]
struct ResourceEntry {
    nombre: String,
    url: String,
}

/// Resource name to url mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    urls: HashMap<String, String>,
}

impl Endpoints {
    /// Build the map from the bootstrap document. Later duplicates win.
    pub fn from_resources(doc: serde_json::Value) -> Result<Self> {
        let doc: ResourcesDocument = serde_json::from_value(doc)?;

        let urls = doc
            .info_recursos
            .into_iter()
            .map(|entry| (entry.nombre, entry.url))
            .collect();

        Ok(Self { urls })
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.urls
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| InumetError::MissingEndpoint(name.to_string()))
    }

    /// The forecast resource is listed as a `.mch` file; its JSON twin lives beside it.
    pub fn forecast_json(&self) -> Result<String> {
        Ok(self.get(FORECAST)?.replace(".mch", ".json"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.urls.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.urls.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Join a resource path onto the base url. Absolute urls pass through untouched.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
