use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{recommend, scoring, tdm, SiteAnalyzer};
use crate::models::{
    AmenitiesQuery, AmenitiesResponse, AnalysisResponse, AnalyzeRequest, Coordinate, ErrorResponse,
    GeocodeQuery, GeocodedAddress, HealthResponse, Recommendation, ScenarioRequest,
    ScenarioResponse, ScoreSet,
};
use crate::services::{
    CacheKey, Caches, GeocodeError, Geocoder, NarrativeClient, OverpassClient, SiteContext,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<Geocoder>,
    pub overpass: Arc<OverpassClient>,
    pub narrative: Option<Arc<NarrativeClient>>,
    pub caches: Arc<Caches>,
    pub analyzer: SiteAnalyzer,
}

/// Configure all analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/geocode", web::get().to(geocode))
        .route("/amenities", web::get().to(amenities))
        .route("/analyze", web::post().to(analyze))
        .route("/scenario", web::post().to(scenario))
        .route("/tdm/programs", web::get().to(tdm_programs));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Geocode endpoint
///
/// GET /api/v1/geocode?address={address}
async fn geocode(state: web::Data<AppState>, query: web::Query<GeocodeQuery>) -> impl Responder {
    let address = query.address.trim();
    if address.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Missing address".to_string(),
            message: "address query parameter is required".to_string(),
            status_code: 400,
        });
    }

    let cache_key = CacheKey::geocode(address);
    if let Ok(cached) = state.caches.geocode.get::<GeocodedAddress>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match state.geocoder.geocode(address).await {
        Ok(result) => {
            if let Err(e) = state.caches.geocode.set(&cache_key, &result).await {
                tracing::warn!("Failed to cache geocode result: {}", e);
            }
            HttpResponse::Ok().json(result)
        }
        Err(GeocodeError::NotFound) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Address not found".to_string(),
            message: "No match for the given address".to_string(),
            status_code: 404,
        }),
        Err(GeocodeError::OutOfRegion(region)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Address outside supported region".to_string(),
            message: format!("Please enter an address in {}", region),
            status_code: 400,
        }),
        Err(e) => {
            tracing::error!("Geocoding failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to geocode address".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Amenities endpoint: fetch, classify and rank nearby POIs
///
/// GET /api/v1/amenities?lat={lat}&lng={lng}
async fn amenities(state: web::Data<AppState>, query: web::Query<AmenitiesQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let site = Coordinate::new(query.lat, query.lng);
    let cache_key = CacheKey::amenities(site.lat, site.lng);

    if let Ok(cached) = state
        .caches
        .amenities
        .get::<AmenitiesResponse>(&cache_key)
        .await
    {
        return HttpResponse::Ok().json(cached);
    }

    let pois = match state.overpass.fetch_pois(site).await {
        Ok(pois) => pois,
        Err(e) => {
            tracing::error!("Amenity fetch failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch amenities".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let classified = state
        .analyzer
        .classify_pois(site, &pois, state.overpass.radius_meters());

    tracing::info!(
        "Classified {} amenities from {} POIs at {:.5},{:.5}",
        classified.len(),
        pois.len(),
        site.lat,
        site.lng
    );

    let response = AmenitiesResponse {
        count: classified.len(),
        amenities: classified,
    };

    if let Err(e) = state.caches.amenities.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache amenities: {}", e);
    }

    HttpResponse::Ok().json(response)
}

/// Analyze endpoint: score a site and produce a density recommendation
///
/// POST /api/v1/analyze
///
/// Request body:
/// ```json
/// {
///   "address": "string",
///   "lat": 38.5816,
///   "lng": -121.4944,
///   "amenities": [ ... ]
/// }
/// ```
async fn analyze(state: web::Data<AppState>, req: web::Json<AnalyzeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for analyze request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let cache_key = CacheKey::analysis(&req.address);
    if let Ok(cached) = state
        .caches
        .analysis
        .get::<AnalysisResponse>(&cache_key)
        .await
    {
        return HttpResponse::Ok().json(cached);
    }

    let scores = state.analyzer.score(&req.amenities);

    let recommendation = narrative_or_fallback(&state, &req, &scores).await;

    let response = AnalysisResponse {
        scores: ScoreSet {
            density: scoring::density_score(recommendation.suggested_units),
            ..scores
        },
        recommendation: recommendation.summary,
        suggested_units: recommendation.suggested_units,
        recommended_height: recommendation.recommended_height,
        reasoning: recommendation.reasoning,
    };

    tracing::info!(
        "Analyzed {}: walk {} bike {} transit {} -> {} units",
        req.address,
        response.scores.walkability,
        response.scores.bikeability,
        response.scores.transit,
        response.suggested_units
    );

    if let Err(e) = state.caches.analysis.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache analysis: {}", e);
    }

    HttpResponse::Ok().json(response)
}

/// Ask the narrative service for a recommendation, substituting the
/// deterministic fallback on any failure so the response shape never
/// changes.
async fn narrative_or_fallback(
    state: &web::Data<AppState>,
    req: &AnalyzeRequest,
    scores: &ScoreSet,
) -> Recommendation {
    if let Some(narrative) = &state.narrative {
        let ctx = SiteContext {
            address: &req.address,
            walkability: scores.walkability,
            bikeability: scores.bikeability,
            transit: scores.transit,
            amenities: &req.amenities,
        };
        match narrative.recommend(&ctx).await {
            Ok(recommendation) => return recommendation,
            Err(e) => {
                tracing::warn!("Narrative service failed, using fallback: {}", e);
            }
        }
    }

    recommend::fallback_recommendation(scores.walkability, scores.bikeability, scores.transit)
}

/// Scenario endpoint: evaluate a building configuration with TDM programs
///
/// POST /api/v1/scenario
///
/// Request body:
/// ```json
/// {
///   "building": { "floors": 3, "totalSqFt": 24000, "units": 24, ... },
///   "selectedPrograms": ["transit-subsidy", "car-share"],
///   "scores": { "walkability": 70, "bikeability": 50, "transit": 60 }
/// }
/// ```
async fn scenario(state: web::Data<AppState>, req: web::Json<ScenarioRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let impact = match state.analyzer.evaluate_scenario(
        &req.building,
        &req.selected_programs,
        req.scores.walkability,
        req.scores.bikeability,
        req.scores.transit,
    ) {
        Ok(impact) => impact,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid scenario".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let recommendations = tdm::tdm_recommendations(
        req.scores.walkability,
        req.scores.bikeability,
        req.scores.transit,
    );

    HttpResponse::Ok().json(ScenarioResponse {
        impact,
        recommendations,
    })
}

/// TDM program catalog endpoint
///
/// GET /api/v1/tdm/programs
async fn tdm_programs() -> impl Responder {
    let programs = tdm::catalog();
    HttpResponse::Ok().json(serde_json::json!({
        "programs": programs,
        "count": programs.len(),
    }))
}
