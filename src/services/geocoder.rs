use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::GeocodedAddress;

/// Errors that can occur when resolving an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("address not found")]
    NotFound,

    #[error("address is outside the supported region ({0})")]
    OutOfRegion(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim geocoding client
///
/// Resolves free-form street addresses and restricts hits to the
/// configured jurisdiction. Nominatim's usage policy requires an
/// identifying User-Agent on every request.
pub struct Geocoder {
    base_url: String,
    user_agent: String,
    country_codes: String,
    region_filter: String,
    default_city: String,
    client: Client,
}

impl Geocoder {
    pub fn new(
        base_url: String,
        user_agent: String,
        country_codes: String,
        region_filter: String,
        default_city: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            user_agent,
            country_codes,
            region_filter,
            default_city,
            client,
        }
    }

    /// Resolve an address to coordinates within the supported region
    pub async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
        let url = format!(
            "{}/search?q={}&format=json&countrycodes={}&limit=5",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(address),
            self.country_codes,
        );

        tracing::debug!("Geocoding address: {}", address);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::InvalidResponse(format!(
                "geocoder returned {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response.json().await?;

        if results.is_empty() {
            return Err(GeocodeError::NotFound);
        }

        let region = self.region_filter.to_lowercase();
        let result = results
            .iter()
            .find(|r| r.display_name.to_lowercase().contains(&region))
            .ok_or_else(|| GeocodeError::OutOfRegion(self.region_filter.clone()))?;

        let lat: f64 = result
            .lat
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude: {}", result.lat)))?;
        let lng: f64 = result
            .lon
            .parse()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude: {}", result.lon)))?;

        Ok(GeocodedAddress {
            lat,
            lng,
            address: result.display_name.clone(),
            city: self.default_city.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geocoder(base_url: String) -> Geocoder {
        Geocoder::new(
            base_url,
            "sitescore-test/0.1".to_string(),
            "us".to_string(),
            "california".to_string(),
            "Sacramento".to_string(),
        )
    }

    #[tokio::test]
    async fn test_geocode_picks_first_in_region_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"lat": "39.5296", "lon": "-119.8138", "display_name": "1012 K Street, Reno, Nevada, United States"},
                    {"lat": "38.5800", "lon": "-121.4928", "display_name": "1012 K Street, Sacramento, California, United States"}
                ]"#,
            )
            .create_async()
            .await;

        let result = geocoder(server.url()).geocode("1012 K Street").await.unwrap();

        assert_eq!(result.lat, 38.5800);
        assert_eq!(result.lng, -121.4928);
        assert!(result.address.contains("California"));
        assert_eq!(result.city, "Sacramento");
    }

    #[tokio::test]
    async fn test_geocode_empty_results_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let result = geocoder(server.url()).geocode("nowhere at all").await;

        assert!(matches!(result, Err(GeocodeError::NotFound)));
    }

    #[tokio::test]
    async fn test_geocode_out_of_region() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"lat": "40.7128", "lon": "-74.0060", "display_name": "New York, United States"}]"#,
            )
            .create_async()
            .await;

        let result = geocoder(server.url()).geocode("New York").await;

        assert!(matches!(result, Err(GeocodeError::OutOfRegion(_))));
    }
}
