use serde::{Deserialize, Serialize};

use crate::config::LocationConfig;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where timings and calendars are computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub city: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
}

impl Default for Place {
    fn default() -> Self {
        Self {
            city: "Delhi".to_string(),
            country: "India".to_string(),
            coordinates: Some(Coordinates {
                latitude: 28.6139,
                longitude: 77.2090,
            }),
        }
    }
}

impl Place {
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Reverse-geocoding result; either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialPlace {
    pub city: Option<String>,
    pub country: Option<String>,
}

pub trait Geolocator {
    fn request_permission(&self) -> Permission;
    fn current_coordinates(&self) -> EngineResult<Coordinates>;
    fn reverse_geocode(&self, coords: Coordinates) -> PartialPlace;
}

/// Answers location queries from the `[location]` config section.
#[derive(Debug, Clone)]
pub struct ConfigGeolocator {
    config: LocationConfig,
}

impl ConfigGeolocator {
    pub fn new(config: LocationConfig) -> Self {
        Self { config }
    }
}

impl Geolocator for ConfigGeolocator {
    fn request_permission(&self) -> Permission {
        if self.config.detect {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn current_coordinates(&self) -> EngineResult<Coordinates> {
        match (self.config.latitude, self.config.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(EngineError::LocationUnavailable(
                "no coordinates configured".to_string(),
            )),
        }
    }

    fn reverse_geocode(&self, _coords: Coordinates) -> PartialPlace {
        PartialPlace {
            city: self.config.city.clone().filter(|c| !c.is_empty()),
            country: self.config.country.clone().filter(|c| !c.is_empty()),
        }
    }
}

/// The place in use, and why the fallback was taken if it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub place: Place,
    pub fallback_reason: Option<EngineError>,
}

/// Resolve the current place. Permission denial and lookup failure are
/// ordinary outcomes that land on `fallback`.
pub fn locate<G: Geolocator + ?Sized>(geo: &G, fallback: &Place) -> Located {
    if geo.request_permission() == Permission::Denied {
        log::warn!("location permission denied, using {}", fallback.label());
        return Located {
            place: fallback.clone(),
            fallback_reason: Some(EngineError::LocationPermissionDenied),
        };
    }

    let coords = match geo.current_coordinates() {
        Ok(coords) => coords,
        Err(e) => {
            log::warn!("{}, using {}", e, fallback.label());
            let reason = match e {
                EngineError::LocationUnavailable(_) => e,
                other => EngineError::LocationUnavailable(other.to_string()),
            };
            return Located {
                place: fallback.clone(),
                fallback_reason: Some(reason),
            };
        }
    };

    let partial = geo.reverse_geocode(coords);
    Located {
        place: Place {
            city: partial.city.unwrap_or_else(|| fallback.city.clone()),
            country: partial.country.unwrap_or_else(|| fallback.country.clone()),
            coordinates: Some(coords),
        },
        fallback_reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(detect: bool, coords: Option<(f64, f64)>, city: Option<&str>) -> LocationConfig {
        LocationConfig {
            detect,
            city: city.map(str::to_string),
            country: Some("Turkey".to_string()),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
        }
    }

    #[test]
    fn denied_permission_falls_back() {
        let geo = ConfigGeolocator::new(config(false, Some((41.0, 29.0)), Some("Istanbul")));
        let located = locate(&geo, &Place::default());
        assert_eq!(located.place, Place::default());
        assert_eq!(
            located.fallback_reason,
            Some(EngineError::LocationPermissionDenied)
        );
    }

    #[test]
    fn missing_coordinates_falls_back() {
        let geo = ConfigGeolocator::new(config(true, None, Some("Istanbul")));
        let located = locate(&geo, &Place::default());
        assert_eq!(located.place.city, "Delhi");
        assert!(matches!(
            located.fallback_reason,
            Some(EngineError::LocationUnavailable(_))
        ));
    }

    #[test]
    fn partial_reverse_geocode_fills_from_fallback() {
        let geo = ConfigGeolocator::new(config(true, Some((41.0, 29.0)), None));
        let located = locate(&geo, &Place::default());
        assert_eq!(located.place.city, "Delhi");
        assert_eq!(located.place.country, "Turkey");
        assert_eq!(
            located.place.coordinates,
            Some(Coordinates {
                latitude: 41.0,
                longitude: 29.0
            })
        );
        assert!(located.fallback_reason.is_none());
    }
}
