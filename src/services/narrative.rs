use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Amenity, AmenityCategory, Recommendation};

/// Errors that can occur when requesting an AI density narrative
///
/// Callers treat any of these as a signal to substitute the
/// deterministic fallback recommendation.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("no JSON object found in model reply")]
    MissingJson,

    #[error("malformed recommendation: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Site data handed to the narrative model
#[derive(Debug, Clone, Copy)]
pub struct SiteContext<'a> {
    pub address: &'a str,
    pub walkability: u32,
    pub bikeability: u32,
    pub transit: u32,
    pub amenities: &'a [Amenity],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Anthropic messages API client producing density recommendations
pub struct NarrativeClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl NarrativeClient {
    pub fn new(base_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            max_tokens,
            client,
        }
    }

    /// Request a density recommendation for a site
    pub async fn recommend(&self, ctx: &SiteContext<'_>) -> Result<Recommendation, NarrativeError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let prompt = build_prompt(ctx);

        let payload = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NarrativeError::ApiError(format!(
                "narrative service returned {}",
                response.status()
            )));
        }

        let message: MessagesResponse = response.json().await?;
        let text = message
            .content
            .iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.as_str())
            .unwrap_or("");

        let json = extract_json(text).ok_or(NarrativeError::MissingJson)?;
        let recommendation: Recommendation = serde_json::from_str(json)?;

        tracing::debug!(
            "Narrative service suggested {} units at {} stories",
            recommendation.suggested_units,
            recommendation.recommended_height
        );

        Ok(recommendation)
    }
}

/// Build the urban-planning prompt from the site context
fn build_prompt(ctx: &SiteContext<'_>) -> String {
    let mut by_category: HashMap<AmenityCategory, usize> = HashMap::new();
    for amenity in ctx.amenities {
        *by_category.entry(amenity.category).or_insert(0) += 1;
    }
    let mut category_lines: Vec<String> = by_category
        .iter()
        .map(|(category, count)| format!("  {:?}: {}", category, count))
        .collect();
    category_lines.sort();

    let nearby_transit = ctx
        .amenities
        .iter()
        .filter(|a| a.category == AmenityCategory::Transit && a.distance_meters < 400)
        .count();
    let within_walk = ctx
        .amenities
        .iter()
        .filter(|a| a.distance_meters < 800)
        .count();

    format!(
        "You are an urban planning expert analyzing a development site in California.\n\n\
         Address: {}\n\
         Walkability Score: {}/100\n\
         Bikeability Score: {}/100\n\
         Transit Score: {}/100\n\
         Total Nearby Amenities: {}\n\
         Amenities by Category:\n{}\n\
         Transit Stops within 400m: {}\n\
         Total Amenities within 800m (walking): {}\n\n\
         Based on this data, provide a density recommendation for this site. Include:\n\
         1. Suggested number of residential units (considering the walkability and transit access)\n\
         2. Recommended building height (2-4 stories)\n\
         3. Three specific reasons for your recommendation (each 1-2 sentences)\n\n\
         Format your response as JSON:\n\
         {{\n\
           \"suggestedUnits\": <number>,\n\
           \"recommendedHeight\": <number of stories>,\n\
           \"reasoning\": [\"reason 1\", \"reason 2\", \"reason 3\"],\n\
           \"summary\": \"One compelling sentence summarizing why this site works for this density\"\n\
         }}",
        ctx.address,
        ctx.walkability,
        ctx.bikeability,
        ctx.transit,
        ctx.amenities.len(),
        category_lines.join("\n"),
        nearby_transit,
        within_walk,
    )
}

/// Extract the outermost JSON object from a model reply
///
/// Replies sometimes wrap the JSON in prose or markdown fences.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
