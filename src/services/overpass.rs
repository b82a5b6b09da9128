use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Coordinate, RawPoi};

/// Errors that can occur when fetching points of interest
#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<RawPoi>,
}

/// Overpass API client for nearby points of interest
pub struct OverpassClient {
    base_url: String,
    radius_meters: u32,
    client: Client,
}

impl OverpassClient {
    pub fn new(base_url: String, radius_meters: u32, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            radius_meters,
            client,
        }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters as f64
    }

    /// Fetch raw POIs around a site
    ///
    /// Elements without coordinates (ways and relations) are dropped here,
    /// upstream of the classifier's contract.
    pub async fn fetch_pois(&self, site: Coordinate) -> Result<Vec<RawPoi>, OverpassError> {
        let query = build_query(site, self.radius_meters);

        tracing::debug!(
            "Fetching POIs within {}m of {:.5},{:.5}",
            self.radius_meters,
            site.lat,
            site.lng
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OverpassError::ApiError(format!(
                "Overpass returned {}",
                response.status()
            )));
        }

        let data: OverpassResponse = response.json().await?;

        let pois: Vec<RawPoi> = data
            .elements
            .into_iter()
            .filter(|element| element.coordinate().is_some())
            .collect();

        tracing::debug!("Fetched {} POIs with coordinates", pois.len());

        Ok(pois)
    }
}

/// Build the Overpass QL query covering every scoreable amenity selector
fn build_query(site: Coordinate, radius: u32) -> String {
    let around = format!("(around:{},{},{})", radius, site.lat, site.lng);
    format!(
        r#"[out:json][timeout:30];
(
  node["public_transport"="stop_position"]{around};
  node["public_transport"="platform"]{around};
  node["public_transport"="station"]{around};
  node["highway"="bus_stop"]{around};
  node["amenity"="bus_station"]{around};
  node["railway"="station"]{around};
  node["railway"="halt"]{around};
  node["railway"="tram_stop"]{around};
  node["railway"="light_rail"]{around};
  node["railway"="subway_entrance"]{around};
  node["amenity"="ferry_terminal"]{around};

  way["highway"="cycleway"]{around};
  way["cycleway"]{around};
  way["bicycle"="designated"]{around};
  node["amenity"="bicycle_parking"]{around};
  node["amenity"="bicycle_rental"]{around};

  node["amenity"="restaurant"]{around};
  node["amenity"="cafe"]{around};
  node["amenity"="fast_food"]{around};
  node["amenity"="bar"]{around};
  node["amenity"="pub"]{around};

  node["shop"]{around};

  node["amenity"="school"]{around};
  node["amenity"="kindergarten"]{around};
  node["amenity"="college"]{around};
  node["amenity"="university"]{around};
  node["amenity"="library"]{around};

  node["leisure"="park"]{around};
  node["leisure"="playground"]{around};
  node["leisure"="sports_centre"]{around};
  node["leisure"="pitch"]{around};

  node["amenity"="pharmacy"]{around};
  node["amenity"="hospital"]{around};
  node["amenity"="clinic"]{around};
  node["amenity"="doctors"]{around};
);
out body;
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_contains_site_and_radius() {
        let query = build_query(Coordinate::new(38.5816, -121.4944), 1500);

        assert!(query.contains("(around:1500,38.5816,-121.4944)"));
        assert!(query.contains(r#"node["highway"="bus_stop"]"#));
        assert!(query.contains(r#"node["shop"]"#));
        assert!(query.contains("[out:json]"));
    }

    #[tokio::test]
    async fn test_fetch_drops_elements_without_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "elements": [
                        {"type": "node", "id": 1, "lat": 38.5820, "lon": -121.4950, "tags": {"highway": "bus_stop"}},
                        {"type": "way", "id": 2, "tags": {"highway": "cycleway"}},
                        {"type": "node", "id": 3, "lat": 38.5812, "lon": -121.4930, "tags": {"amenity": "cafe"}}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client = OverpassClient::new(server.url(), 1500, 30);
        let pois = client
            .fetch_pois(Coordinate::new(38.5816, -121.4944))
            .await
            .unwrap();

        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].id, 1);
        assert_eq!(pois[1].id, 3);
    }

    #[tokio::test]
    async fn test_fetch_propagates_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(504)
            .create_async()
            .await;

        let client = OverpassClient::new(server.url(), 1500, 30);
        let result = client.fetch_pois(Coordinate::new(38.5816, -121.4944)).await;

        assert!(matches!(result, Err(OverpassError::ApiError(_))));
    }
}
