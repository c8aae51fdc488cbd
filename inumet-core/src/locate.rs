//! Resolving stations and zones from ids, names and coordinates.
//!
//! Distances are great-circle (haversine) kilometres. When two candidates
//! are equally close the one listed first wins, so results only depend on
//! the input order.

use haversine::{Location, Units};

use crate::error::{InumetError, Result};
use crate::model::{Coordinates, Station, Zone};

/// Great-circle distance in kilometres.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    haversine::distance(
        Location {
            latitude: a.latitude,
            longitude: a.longitude,
        },
        Location {
            latitude: b.latitude,
            longitude: b.longitude,
        },
        Units::Kilometers,
    )
}

fn nearest_by<'a, T>(
    items: &'a [T],
    target: Coordinates,
    position: impl Fn(&T) -> Coordinates,
) -> Option<&'a T> {
    items
        .iter()
        .map(|item| (item, distance_km(target, position(item))))
        .filter(|(_, d)| !d.is_nan())
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(item, _)| item)
}

pub fn nearest_station(stations: &[Station], target: Coordinates) -> Result<&Station> {
    target.validate()?;
    nearest_by(stations, target, Station::coordinates)
        .ok_or_else(|| InumetError::not_found("no stations to choose from"))
}

pub fn nearest_zone(zones: &[Zone], target: Coordinates) -> Result<&Zone> {
    target.validate()?;
    nearest_by(zones, target, Zone::centroid)
        .ok_or_else(|| InumetError::not_found("no zones to choose from"))
}

pub fn station_by_id(stations: &[Station], id: i64) -> Result<&Station> {
    stations
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| InumetError::invalid_input(format!("unknown station id {id}")))
}

/// Normalised lookup key; a blank query never names anything.
fn name_query(name: &str, what: &str) -> Result<String> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return Err(InumetError::invalid_input(format!("{what} name is blank")));
    }
    Ok(wanted)
}

/// Candidates without a name never match.
fn same_name(candidate: &str, wanted: &str) -> bool {
    let candidate = normalize_name(candidate);
    !candidate.is_empty() && candidate == wanted
}

pub fn station_by_name<'a>(stations: &'a [Station], name: &str) -> Result<&'a Station> {
    let wanted = name_query(name, "station")?;
    stations
        .iter()
        .find(|s| same_name(&s.name, &wanted))
        .ok_or_else(|| InumetError::invalid_input(format!("unknown station '{name}'")))
}

pub fn zone_by_id(zones: &[Zone], id: i64) -> Result<&Zone> {
    zones
        .iter()
        .find(|z| z.id == id)
        .ok_or_else(|| InumetError::invalid_input(format!("unknown zone id {id}")))
}

pub fn zone_by_name<'a>(zones: &'a [Zone], name: &str) -> Result<&'a Zone> {
    let wanted = name_query(name, "zone")?;
    zones
        .iter()
        .find(|z| same_name(&z.name, &wanted))
        .ok_or_else(|| InumetError::invalid_input(format!("unknown zone '{name}'")))
}

/// First zone covering the named department.
pub fn zone_for_department<'a>(zones: &'a [Zone], department: &str) -> Result<&'a Zone> {
    let wanted = name_query(department, "department")?;
    zones
        .iter()
        .find(|z| z.departments.iter().any(|d| same_name(d, &wanted)))
        .ok_or_else(|| {
            InumetError::invalid_input(format!("no zone covers department '{department}'"))
        })
}

/// Lowercase, strip Spanish diacritics and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .flat_map(char::to_lowercase)
                .map(|c| match c {
                    'á' | 'à' | 'â' | 'ä' => 'a',
                    'é' | 'è' | 'ê' | 'ë' => 'e',
                    'í' | 'ì' | 'î' | 'ï' => 'i',
                    'ó' | 'ò' | 'ô' | 'ö' => 'o',
                    'ú' | 'ù' | 'û' | 'ü' => 'u',
                    'ñ' => 'n',
                    other => other,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: i64, name: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id,
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            station(86580, "Carrasco", -34.83, -56.01),
            station(86360, "Salto", -31.43, -57.98),
            station(86565, "Rocha", -34.49, -54.31),
            station(86585, "Prado", -34.86, -56.20),
        ]
    }

    fn zones() -> Vec<Zone> {
        vec![
            Zone {
                id: 1,
                name: "Litoral Norte".into(),
                latitude: -31.5,
                longitude: -57.5,
                departments: vec!["Artigas".into(), "Salto".into(), "Paysandú".into()],
            },
            Zone {
                id: 4,
                name: "Sur".into(),
                latitude: -34.7,
                longitude: -56.0,
                departments: vec!["Montevideo".into(), "Canelones".into()],
            },
            Zone {
                id: 5,
                name: "Este".into(),
                latitude: -34.3,
                longitude: -54.5,
                departments: vec!["Rocha".into(), "Maldonado".into()],
            },
        ]
    }

    #[test]
    fn distance_between_montevideo_and_salto() {
        let mvd = Coordinates { latitude: -34.9, longitude: -56.16 };
        let salto = Coordinates { latitude: -31.38, longitude: -57.96 };
        let d = distance_km(mvd, salto);
        assert!((d - 426.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn nearest_station_picks_closest() {
        let list = stations();
        let downtown = Coordinates { latitude: -34.90, longitude: -56.19 };
        assert_eq!(nearest_station(&list, downtown).unwrap().name, "Prado");

        let north = Coordinates { latitude: -30.9, longitude: -57.5 };
        assert_eq!(nearest_station(&list, north).unwrap().id, 86360);
    }

    #[test]
    fn nearest_station_is_deterministic_on_ties() {
        let list = vec![
            station(1, "A", -34.0, -56.0),
            station(2, "B", -34.0, -56.0),
        ];
        let here = Coordinates { latitude: -34.5, longitude: -56.0 };
        for _ in 0..10 {
            assert_eq!(nearest_station(&list, here).unwrap().id, 1);
        }
    }

    #[test]
    fn nearest_in_empty_list_is_not_found() {
        let here = Coordinates { latitude: -34.5, longitude: -56.0 };
        let err = nearest_station(&[], here).unwrap_err();
        assert!(matches!(err, InumetError::NotFound(_)));
    }

    #[test]
    fn nearest_rejects_bad_coordinates() {
        let bad = Coordinates { latitude: 120.0, longitude: 0.0 };
        assert!(nearest_zone(&zones(), bad).unwrap_err().is_invalid_input());
    }

    #[test]
    fn nearest_zone_uses_centroid() {
        let punta = Coordinates { latitude: -34.96, longitude: -54.95 };
        assert_eq!(nearest_zone(&zones(), punta).unwrap().id, 5);
    }

    #[test]
    fn lookup_by_name_ignores_case_and_accents() {
        let list = zones();
        assert_eq!(zone_by_name(&list, "  litoral   NORTE ").unwrap().id, 1);
        assert_eq!(zone_for_department(&list, "paysandu").unwrap().id, 1);
        assert_eq!(station_by_name(&stations(), "CARRASCO").unwrap().id, 86580);
    }

    #[test]
    fn unknown_zone_is_invalid_input() {
        let list = zones();
        assert!(zone_by_name(&list, "Centro").unwrap_err().is_invalid_input());
        assert!(zone_by_id(&list, 99).unwrap_err().is_invalid_input());
        assert!(zone_for_department(&list, "Durazno").unwrap_err().is_invalid_input());
    }

    #[test]
    fn unknown_station_is_invalid_input() {
        assert!(station_by_id(&stations(), 1).unwrap_err().is_invalid_input());
        assert!(station_by_name(&stations(), "Melo").unwrap_err().is_invalid_input());
    }

    #[test]
    fn blank_names_never_match() {
        let mut list = zones();
        list.push(Zone {
            id: 7,
            name: String::new(),
            latitude: -33.0,
            longitude: -55.0,
            departments: vec!["  ".into()],
        });

        assert!(zone_by_name(&list, "  ").unwrap_err().is_invalid_input());
        assert!(zone_by_name(&list, "").unwrap_err().is_invalid_input());
        assert!(zone_for_department(&list, " ").unwrap_err().is_invalid_input());
        assert!(station_by_name(&stations(), "\t").unwrap_err().is_invalid_input());
    }

    #[test]
    fn normalize_folds_diacritics() {
        assert_eq!(normalize_name("Paysandú"), "paysandu");
        assert_eq!(normalize_name(" Tacuarembó  Centro"), "tacuarembo centro");
    }
}
