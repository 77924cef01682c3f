//! Address to coordinate resolution.

use serde::Deserialize;
use tile_index::GeoPoint;

use crate::config::FetchConfig;
use crate::errors::{FetchError, FetchResult, GeocodeError, GeocodeResult};
use crate::progress::NoProgress;
use crate::transport::{ReqwestTransport, Transport};

/// Resolves a free-form address to a point.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> GeocodeResult<GeoPoint>;
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Geocoder backed by a Nominatim search endpoint. Only the best match is
/// used.
pub struct NominatimGeocoder<T: Transport> {
    transport: T,
    endpoint: String,
}

impl NominatimGeocoder<ReqwestTransport> {
    pub fn from_config(config: &FetchConfig) -> FetchResult<Self> {
        Ok(Self::new(
            ReqwestTransport::from_config(config)?,
            config.get_geocoder_url(),
        ))
    }
}

impl<T: Transport> NominatimGeocoder<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Search URL for `address`.
    pub fn search_url(&self, address: &str) -> GeocodeResult<String> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoint,
            &[("q", address), ("format", "jsonv2"), ("limit", "1")],
        )
        .map_err(|e| FetchError::Http(format!("Invalid geocoder endpoint: {}", e)))?;
        Ok(url.into())
    }
}

impl<T: Transport> Geocoder for NominatimGeocoder<T> {
    fn geocode(&self, address: &str) -> GeocodeResult<GeoPoint> {
        log::info!("Retrieving location for address: {}", address);

        let url = self.search_url(address)?;
        let mut body = Vec::new();
        self.transport.get(&url, &mut body, &mut NoProgress)?;

        let places: Vec<Place> = serde_json::from_slice(&body)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

        let latitude = parse_degrees(&place.lat)?;
        let longitude = parse_degrees(&place.lon)?;
        log::info!("{}", describe(address, &place.display_name, latitude, longitude));

        Ok(GeoPoint::new(latitude, longitude)?)
    }
}

/// The resolved location as shown to the user.
fn describe(address: &str, display_name: &str, latitude: f64, longitude: f64) -> String {
    if display_name.is_empty() {
        format!("Resolved {:?} to ({}, {})", address, latitude, longitude)
    } else {
        format!(
            "Resolved {:?} to {} ({}, {})",
            address, display_name, latitude, longitude
        )
    }
}

fn parse_degrees(value: &str) -> GeocodeResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("not a number: {:?}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    const ENDPOINT: &str = "https://nominatim.example.com/search";

    fn geocoder(address: &str, body: &str) -> NominatimGeocoder<MockTransport> {
        let url = NominatimGeocoder::new(MockTransport::new(), ENDPOINT)
            .search_url(address)
            .unwrap();
        NominatimGeocoder::new(MockTransport::new().with(&url, body.as_bytes()), ENDPOINT)
    }

    #[test]
    fn test_search_url() {
        let geocoder = NominatimGeocoder::new(MockTransport::new(), ENDPOINT);
        let url = geocoder.search_url("1600 Pennsylvania Ave").unwrap();
        assert!(url.starts_with(ENDPOINT));
        assert!(url.contains("q=1600+Pennsylvania+Ave"));
        assert!(url.contains("format=jsonv2"));
        assert!(url.contains("limit=1"));
    }

    #[test]
    fn test_geocode_first_match() {
        let body = r#"[
            {"lat": "38.8976633", "lon": "-77.0365739", "display_name": "White House"},
            {"lat": "0.0", "lon": "0.0", "display_name": "Elsewhere"}
        ]"#;
        let point = geocoder("White House", body).geocode("White House").unwrap();
        assert!((point.latitude() - 38.8976633).abs() < 1e-9);
        assert!((point.longitude() + 77.0365739).abs() < 1e-9);
    }

    #[test]
    fn test_describe_resolved_place() {
        assert_eq!(
            describe("White House", "White House, Washington", 38.5, -77.0),
            "Resolved \"White House\" to White House, Washington (38.5, -77)"
        );
        assert_eq!(describe("x", "", 1.0, 2.0), "Resolved \"x\" to (1, 2)");
    }

    #[test]
    fn test_geocode_no_match() {
        let err = geocoder("nowhere", "[]").geocode("nowhere").unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(ref a) if a == "nowhere"));
    }

    #[test]
    fn test_geocode_bad_json() {
        let err = geocoder("x", "<html>").geocode("x").unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidResponse(_)));
    }

    #[test]
    fn test_geocode_out_of_range() {
        let body = r#"[{"lat": "91.0", "lon": "0.0"}]"#;
        let err = geocoder("pole", body).geocode("pole").unwrap_err();
        assert!(matches!(err, GeocodeError::Coordinate(_)));
    }

    #[test]
    fn test_geocode_http_failure() {
        let geocoder = NominatimGeocoder::new(MockTransport::new(), ENDPOINT);
        let err = geocoder.geocode("x").unwrap_err();
        assert!(matches!(
            err,
            GeocodeError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }
}
