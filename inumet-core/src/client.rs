//! The INUMET client facade.
//!
//! Construction fetches the resource map and settles on an optional station
//! and zone; every accessor afterwards is a single GET against a url taken
//! from that map.

use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::endpoints::{self, Endpoints, resolve_url};
use crate::error::{InumetError, Result};
use crate::locate;
use crate::model::{
    AlertBundle, Coordinates, CurrentConditions, CurrentReport, Department, DepartmentsResponse,
    ForecastItem, ForecastResponse, Station, StationsResponse, Zone, ZonesResponse,
};
use crate::transport::{HttpTransport, Transport};

#[derive(Debug, Clone, PartialEq)]
enum StationSelector {
    Id(i64),
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
enum ZoneSelector {
    Id(i64),
    Name(String),
    Department(String),
}

/// Config values are free text; numbers are ids, anything else a name.
fn parse_station(raw: &str) -> StationSelector {
    match raw.trim().parse() {
        Ok(id) => StationSelector::Id(id),
        Err(_) => StationSelector::Name(raw.to_string()),
    }
}

fn parse_zone(raw: &str) -> ZoneSelector {
    match raw.trim().parse() {
        Ok(id) => ZoneSelector::Id(id),
        Err(_) => ZoneSelector::Name(raw.to_string()),
    }
}

/// Builder for [`InumetClient`].
#[derive(Debug, Default)]
pub struct InumetClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    station: Option<StationSelector>,
    zone: Option<ZoneSelector>,
    near: Option<(f64, f64)>,
}

impl InumetClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn station_id(mut self, id: i64) -> Self {
        self.station = Some(StationSelector::Id(id));
        self
    }

    pub fn station_name(mut self, name: impl Into<String>) -> Self {
        self.station = Some(StationSelector::Name(name.into()));
        self
    }

    pub fn zone_id(mut self, id: i64) -> Self {
        self.zone = Some(ZoneSelector::Id(id));
        self
    }

    pub fn zone_name(mut self, name: impl Into<String>) -> Self {
        self.zone = Some(ZoneSelector::Name(name.into()));
        self
    }

    /// Use the zone covering this department.
    pub fn department(mut self, name: impl Into<String>) -> Self {
        self.zone = Some(ZoneSelector::Department(name.into()));
        self
    }

    /// Pick the nearest station and zone for whichever of the two is not set explicitly.
    pub fn near(mut self, latitude: f64, longitude: f64) -> Self {
        self.near = Some((latitude, longitude));
        self
    }

    pub async fn build(self) -> Result<InumetClient> {
        let InumetClientBuilder {
            config,
            transport,
            station,
            zone,
            near,
        } = self;

        let transport: Arc<dyn Transport> = match transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(config.timeout_secs)?),
        };

        // Stored defaults only fill what the caller left open; runtime coordinates count as a choice.
        let station = match (station, near) {
            (None, None) => config.defaults.station.as_deref().map(parse_station),
            (station, _) => station,
        };
        let zone = match (zone, near) {
            (None, None) => config.defaults.zone.as_deref().map(parse_zone),
            (zone, _) => zone,
        };
        let near = match near {
            Some((lat, lon)) => Some(Coordinates::new(lat, lon)?),
            None => config.defaults.coordinates()?,
        };

        let resources_url = resolve_url(&config.base_url, &config.resources_path);
        let endpoints = Endpoints::from_resources(transport.get_json(&resources_url).await?)?;
        tracing::debug!(resources = endpoints.len(), "endpoint map loaded");

        let mut client = InumetClient {
            transport,
            base_url: config.base_url,
            endpoints,
            station_id: None,
            zone_id: None,
        };

        if station.is_some() || near.is_some() {
            let stations = client.stations().await?;
            let picked = match (&station, near) {
                (Some(StationSelector::Id(id)), _) => Some(locate::station_by_id(&stations, *id)?),
                (Some(StationSelector::Name(name)), _) => {
                    Some(locate::station_by_name(&stations, name)?)
                }
                (None, Some(at)) => Some(locate::nearest_station(&stations, at)?),
                (None, None) => None,
            };
            if let Some(picked) = picked {
                tracing::info!(station = picked.id, name = %picked.name, "station selected");
                client.station_id = Some(picked.id);
            }
        }

        if zone.is_some() || near.is_some() {
            let zones = client.zones().await?;
            let picked = match (&zone, near) {
                (Some(ZoneSelector::Id(id)), _) => Some(locate::zone_by_id(&zones, *id)?),
                (Some(ZoneSelector::Name(name)), _) => Some(locate::zone_by_name(&zones, name)?),
                (Some(ZoneSelector::Department(name)), _) => {
                    Some(locate::zone_for_department(&zones, name)?)
                }
                (None, Some(at)) => Some(locate::nearest_zone(&zones, at)?),
                (None, None) => None,
            };
            if let Some(picked) = picked {
                tracing::info!(zone = picked.id, name = %picked.name, "zone selected");
                client.zone_id = Some(picked.id);
            }
        }

        Ok(client)
    }
}

/// Client for the INUMET web API.
#[derive(Debug, Clone)]
pub struct InumetClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    endpoints: Endpoints,
    station_id: Option<i64>,
    zone_id: Option<i64>,
}

impl InumetClient {
    pub fn builder() -> InumetClientBuilder {
        InumetClientBuilder::default()
    }

    /// Client against the live service with no station or zone selected.
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Client using `config`, including its default station, zone and coordinates.
    pub async fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build().await
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn station_id(&self) -> Option<i64> {
        self.station_id
    }

    pub fn zone_id(&self) -> Option<i64> {
        self.zone_id
    }

    async fn fetch_path<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = resolve_url(&self.base_url, path);
        let doc = self.transport.get_json(&url).await?;
        Ok(serde_json::from_value(doc)?)
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let path = self.endpoints.get(resource)?.to_string();
        self.fetch_path(&path).await
    }

    pub async fn stations(&self) -> Result<Vec<Station>> {
        let res: StationsResponse = self.fetch(endpoints::STATIONS).await?;
        Ok(res.estaciones)
    }

    pub async fn zones(&self) -> Result<Vec<Zone>> {
        let res: ZonesResponse = self.fetch(endpoints::ZONES).await?;
        Ok(res.zonas)
    }

    pub async fn departments(&self) -> Result<Vec<Department>> {
        let res: DepartmentsResponse = self.fetch(endpoints::DEPARTMENTS).await?;
        Ok(res.departamentos)
    }

    pub async fn current_report(&self) -> Result<CurrentReport> {
        self.fetch(endpoints::CURRENT).await
    }

    /// Current conditions for the selected station, or for every station if none is selected.
    pub async fn current_conditions(&self) -> Result<Vec<CurrentConditions>> {
        let report = self.current_report().await?;

        match self.station_id {
            Some(id) => {
                let found = report.station(id).cloned().ok_or_else(|| {
                    InumetError::not_found(format!("station {id} is missing from the current report"))
                })?;
                Ok(vec![found])
            }
            None => Ok(report.stations),
        }
    }

    /// Forecast items for the selected zone, or for every zone if none is selected.
    pub async fn forecast(&self) -> Result<Vec<ForecastItem>> {
        let path = self.endpoints.forecast_json()?;
        let res: ForecastResponse = self.fetch_path(&path).await?;

        let Some(zone) = self.zone_id else {
            return Ok(res.items);
        };

        let zones = self.zones().await?;
        if !zones.iter().any(|z| z.id == zone) {
            return Err(InumetError::invalid_input(format!("unknown zone id {zone}")));
        }

        Ok(res.items.into_iter().filter(|i| i.zone_id == zone).collect())
    }

    pub async fn alerts(&self) -> Result<AlertBundle> {
        self.fetch(endpoints::ALERTS).await
    }

    /// Check the selected station and zone still exist upstream.
    pub async fn validate(&self) -> Result<()> {
        if let Some(id) = self.station_id {
            locate::station_by_id(&self.stations().await?, id)?;
        }
        if let Some(id) = self.zone_id {
            locate::zone_by_id(&self.zones().await?, id)?;
        }
        Ok(())
    }

    pub async fn nearest_station(&self, latitude: f64, longitude: f64) -> Result<Station> {
        let at = Coordinates::new(latitude, longitude)?;
        let stations = self.stations().await?;
        locate::nearest_station(&stations, at).cloned()
    }

    pub async fn nearest_zone(&self, latitude: f64, longitude: f64) -> Result<Zone> {
        let at = Coordinates::new(latitude, longitude)?;
        let zones = self.zones().await?;
        locate::nearest_zone(&zones, at).cloned()
    }

    /// Raw document from the superseded forecast resource.
    pub async fn legacy_forecast(&self) -> Result<serde_json::Value> {
        self.fetch(endpoints::LEGACY_FORECAST).await
    }

    /// Raw document from the superseded risk-level resource.
    pub async fn legacy_alerts(&self) -> Result<serde_json::Value> {
        self.fetch(endpoints::LEGACY_ALERTS).await
    }
}
