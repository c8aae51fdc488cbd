use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::condition::Condition;
use crate::error::{InumetError, Result};

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coords = Self { latitude, longitude };
        coords.validate()?;
        Ok(coords)
    }

    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && self.latitude.abs() <= 90.0;
        let lon_ok = self.longitude.is_finite() && self.longitude.abs() <= 180.0;

        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(InumetError::invalid_input(format!(
                "invalid coordinates: lat={}, lon={}",
                self.latitude, self.longitude
            )))
        }
    }
}

/// Observation station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
}

impl Station {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Forecast zone. Position is the zone centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "idInt")]
    pub id: i64,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
    #[serde(rename = "departamentos", default)]
    pub departments: Vec<String>,
}

impl Zone {
    pub fn centroid(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StationsResponse {
    pub estaciones: Vec<Station>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ZonesResponse {
    pub zonas: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentsResponse {
    pub departamentos: Vec<Department>,
}

/// Latest readings of one station. Reading names are the ones INUMET uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(rename = "estacion")]
    pub station_id: i64,
    #[serde(flatten)]
    pub readings: BTreeMap<String, Value>,
}

impl CurrentConditions {
    /// Numeric reading; accepts numbers and numeric strings with either decimal separator.
    pub fn reading(&self, name: &str) -> Option<f64> {
        match self.readings.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse().ok(),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.readings.get(name).and_then(Value::as_str)
    }
}

/// The whole current-conditions document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReport {
    #[serde(rename = "Fecha", default)]
    pub date: String,
    #[serde(rename = "Hora", default)]
    pub time: String,
    #[serde(rename = "estaciones")]
    pub stations: Vec<CurrentConditions>,
}

impl CurrentReport {
    /// Observation time, when `Fecha`/`Hora` are in a format we recognise.
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        let date = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(self.date.trim(), fmt).ok())?;
        let time = ["%H:%M", "%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(self.time.trim(), fmt).ok())?;

        Some(date.and_time(time))
    }

    pub fn station(&self, station_id: i64) -> Option<&CurrentConditions> {
        self.stations.iter().find(|s| s.station_id == station_id)
    }
}

/// One forecast entry for a zone and day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    #[serde(rename = "zonaId")]
    pub zone_id: i64,
    /// Days after the issue date; 0 is today.
    #[serde(rename = "diaMasN", default)]
    pub day_offset: i64,
    #[serde(rename = "estadoTiempo", default)]
    pub weather_code: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ForecastItem {
    pub fn condition(&self) -> Option<Condition> {
        self.weather_code.and_then(Condition::from_code)
    }

    pub fn condition_label(&self) -> Option<&'static str> {
        self.condition().map(|c| c.label())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub items: Vec<ForecastItem>,
}

/// Risk warnings as issued by the duty forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBundle {
    #[serde(rename = "pronosticador", default)]
    pub forecaster: String,
    #[serde(rename = "advertencias", default)]
    pub warnings: Vec<Value>,
    #[serde(rename = "fechaActualizacion", default)]
    pub updated: String,
    #[serde(rename = "mapaMerge", default)]
    pub map: Value,
}

impl AlertBundle {
    pub fn updated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.updated.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }

        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinates_out_of_range_are_rejected() {
        assert!(Coordinates::new(-34.9, -56.2).is_ok());
        assert!(Coordinates::new(91.0, 0.0).unwrap_err().is_invalid_input());
        assert!(Coordinates::new(0.0, -180.5).unwrap_err().is_invalid_input());
        assert!(Coordinates::new(f64::NAN, 0.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn zone_without_departments_deserializes() {
        let zone: Zone = serde_json::from_value(json!({
            "idInt": 4, "nombre": "Sur", "latitud": -34.6, "longitud": -56.0
        }))
        .unwrap();
        assert!(zone.departments.is_empty());
        assert_eq!(zone.centroid().latitude, -34.6);
    }

    #[test]
    fn current_conditions_keep_all_readings() {
        let cc: CurrentConditions = serde_json::from_value(json!({
            "estacion": 86580,
            "temperatura": 21.4,
            "humedad": "78,5",
            "viento": "NE"
        }))
        .unwrap();

        assert_eq!(cc.station_id, 86580);
        assert_eq!(cc.reading("temperatura"), Some(21.4));
        assert_eq!(cc.reading("humedad"), Some(78.5));
        assert_eq!(cc.reading("viento"), None);
        assert_eq!(cc.text("viento"), Some("NE"));
        assert!(!cc.readings.contains_key("estacion"));
    }

    #[test]
    fn report_time_parses_local_formats() {
        let report = CurrentReport {
            date: "19/10/2026".into(),
            time: "14:00".into(),
            stations: vec![],
        };
        let at = report.observed_at().unwrap();
        assert_eq!(at.to_string(), "2026-10-19 14:00:00");

        let garbled = CurrentReport {
            date: "ayer".into(),
            ..report
        };
        assert_eq!(garbled.observed_at(), None);
    }

    #[test]
    fn forecast_item_derives_condition() {
        let item: ForecastItem = serde_json::from_value(json!({
            "zonaId": 2, "diaMasN": 1, "estadoTiempo": 7, "tempMax": 18
        }))
        .unwrap();
        assert_eq!(item.condition(), Some(Condition::Fog));
        assert_eq!(item.condition_label(), Some("Niebla"));
        assert_eq!(item.extra.get("tempMax"), Some(&json!(18)));

        let unknown = ForecastItem {
            weather_code: Some(404),
            ..item
        };
        assert_eq!(unknown.condition(), None);
    }

    #[test]
    fn alert_timestamp_formats() {
        let mut bundle: AlertBundle = serde_json::from_value(json!({
            "pronosticador": "Met. A. Pérez",
            "advertencias": [],
            "fechaActualizacion": "2026-10-19T09:30:00-03:00",
            "mapaMerge": "mapa.png"
        }))
        .unwrap();
        assert_eq!(bundle.updated_at().unwrap().to_string(), "2026-10-19 09:30:00");
        assert!(!bundle.has_warnings());

        bundle.updated = "19/10/2026 09:30".into();
        assert!(bundle.updated_at().is_some());

        bundle.updated = String::new();
        assert!(bundle.updated_at().is_none());
    }
}
