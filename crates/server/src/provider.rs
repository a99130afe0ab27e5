use std::{collections::HashMap, sync::Mutex};

use roadlog::{
    route::{DistanceProvider, Leg, ProviderError},
    shared::{Duration, Miles},
};
use serde::Deserialize;
use tracing::debug;

const OSRM_API_URL: &str = "http://router.project-osrm.org/route/v1/driving";
const NOMINATIM_API_URL: &str = "https://nominatim.openstreetmap.org";
const USER_AGENT: &str = "roadlog/0.1";
const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    routes: Vec<OsrmRoute>,
}

/// Distance provider backed by the public OSRM routing API, with Nominatim
/// for geocoding location names. Blocking HTTP; callers run it on a blocking
/// task, never on the async executor.
#[derive(Default)]
pub struct OsrmProvider {
    geocoded: Mutex<HashMap<String, (f64, f64)>>,
}

impl OsrmProvider {
    pub fn new() -> Self {
        Default::default()
    }

    fn geocode(&self, address: &str) -> Result<(f64, f64), ProviderError> {
        {
            let geocoded = self.geocoded.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(coords) = geocoded.get(address) {
                return Ok(*coords);
            }
        }

        let client = client()?;
        let url = format!("{NOMINATIM_API_URL}/search");
        let results: Vec<NominatimResult> = client
            .get(url)
            .query(&[("format", "json"), ("q", address)])
            .send()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?
            .json()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;
        let first = results.first().ok_or_else(|| ProviderError::NotFound {
            from: address.to_string(),
            to: address.to_string(),
        })?;
        let coords: (f64, f64) = (
            first.lat.parse().map_err(|_| {
                ProviderError::Unavailable(format!("bad latitude for {address}"))
            })?,
            first.lon.parse().map_err(|_| {
                ProviderError::Unavailable(format!("bad longitude for {address}"))
            })?,
        );
        debug!("Geocoded {address} to {coords:?}");

        let mut geocoded = self.geocoded.lock().unwrap_or_else(|e| e.into_inner());
        geocoded.insert(address.to_string(), coords);
        Ok(coords)
    }
}

impl DistanceProvider for OsrmProvider {
    fn leg(&self, origin: &str, destination: &str) -> Result<Leg, ProviderError> {
        let (from_lat, from_lon) = self.geocode(origin)?;
        let (to_lat, to_lon) = self.geocode(destination)?;

        let client = client()?;
        let url = format!("{OSRM_API_URL}/{from_lon},{from_lat};{to_lon},{to_lat}");
        let response: OsrmResponse = client
            .get(url)
            .query(&[("overview", "false")])
            .send()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?
            .json()
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;
        let route = response.routes.first().ok_or_else(|| ProviderError::NotFound {
            from: origin.to_string(),
            to: destination.to_string(),
        })?;

        Ok(Leg {
            distance: Miles::from_miles(route.distance / METERS_PER_MILE),
            duration: Some(Duration::from_minutes((route.duration / 60.0).round() as u32)),
        })
    }
}

fn client() -> Result<reqwest::blocking::Client, ProviderError> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|err| ProviderError::Unavailable(err.to_string()))
}
