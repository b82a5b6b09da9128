use crate::core::geodesy::distance_meters;
use crate::models::{Amenity, AmenityCategory, Coordinate, RawPoi};

const FOOD_AMENITIES: [&str; 5] = ["restaurant", "cafe", "fast_food", "bar", "pub"];
const EDUCATION_AMENITIES: [&str; 5] = ["school", "kindergarten", "college", "university", "library"];
const PARKS_LEISURE: [&str; 4] = ["park", "playground", "sports_centre", "pitch"];
const HEALTH_AMENITIES: [&str; 4] = ["pharmacy", "hospital", "clinic", "doctors"];

/// Classify a raw POI into an amenity category and tag it with its
/// distance from the site
///
/// Rules are evaluated in a fixed priority order and the first match wins,
/// so a rail station that is also tagged as a shop still classifies as
/// transit. POIs without coordinates return `None`; those are normally
/// dropped by the POI service before classification.
pub fn classify(poi: &RawPoi, site: Coordinate) -> Option<Amenity> {
    let coordinate = poi.coordinate()?;
    let tags = &poi.tags;
    let amenity = tags.get("amenity").map(String::as_str);

    let (category, kind) = if tags.contains_key("public_transport")
        || tags.get("highway").map(String::as_str) == Some("bus_stop")
        || matches!(amenity, Some("bus_station") | Some("ferry_terminal"))
    {
        let kind = tags
            .get("public_transport")
            .cloned()
            .unwrap_or_else(|| "bus_stop".to_string());
        (AmenityCategory::Transit, kind)
    } else if let Some(railway) = tags.get("railway") {
        let kind = if railway == "station" {
            "train_station"
        } else {
            "light_rail"
        };
        (AmenityCategory::Transit, kind.to_string())
    } else if tags.get("highway").map(String::as_str) == Some("cycleway")
        || tags.contains_key("cycleway")
        || tags.get("bicycle").map(String::as_str) == Some("designated")
        || matches!(amenity, Some("bicycle_parking") | Some("bicycle_rental"))
    {
        let kind = tags
            .get("amenity")
            .cloned()
            .unwrap_or_else(|| "bike_lane".to_string());
        (AmenityCategory::Bikeway, kind)
    } else if let Some(food) = amenity.filter(|a| FOOD_AMENITIES.contains(a)) {
        (AmenityCategory::Food, food.to_string())
    } else if let Some(shop) = tags.get("shop") {
        (AmenityCategory::Shopping, shop.clone())
    } else if let Some(education) = amenity.filter(|a| EDUCATION_AMENITIES.contains(a)) {
        (AmenityCategory::Education, education.to_string())
    } else if let Some(leisure) = tags
        .get("leisure")
        .filter(|l| PARKS_LEISURE.contains(&l.as_str()))
    {
        (AmenityCategory::Parks, leisure.clone())
    } else if let Some(health) = amenity.filter(|a| HEALTH_AMENITIES.contains(a)) {
        (AmenityCategory::Health, health.to_string())
    } else {
        (AmenityCategory::Other, "unknown".to_string())
    };

    let name = tags
        .get("name")
        .or_else(|| tags.get("operator"))
        .cloned()
        .unwrap_or_else(|| kind.replace('_', " "));

    Some(Amenity {
        id: poi.id.to_string(),
        name,
        kind,
        category,
        lat: coordinate.lat,
        lng: coordinate.lng,
        distance_meters: distance_meters(site, coordinate).round() as u32,
    })
}
