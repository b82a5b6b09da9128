use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub overpass: OverpassSettings,
    #[serde(default)]
    pub narrative: NarrativeSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_country_codes")]
    pub country_codes: String,
    #[serde(default = "default_region_filter")]
    pub region_filter: String,
    #[serde(default = "default_city")]
    pub default_city: String,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            country_codes: default_country_codes(),
            region_filter: default_region_filter(),
            default_city: default_city(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}
fn default_user_agent() -> String {
    format!("sitescore/{}", env!("CARGO_PKG_VERSION"))
}
fn default_country_codes() -> String {
    "us".to_string()
}
fn default_region_filter() -> String {
    "california".to_string()
}
fn default_city() -> String {
    "Sacramento".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassSettings {
    #[serde(default = "default_overpass_url")]
    pub base_url: String,
    #[serde(default = "default_radius_meters")]
    pub radius_meters: u32,
    #[serde(default = "default_overpass_timeout")]
    pub timeout_secs: u64,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            base_url: default_overpass_url(),
            radius_meters: default_radius_meters(),
            timeout_secs: default_overpass_timeout(),
        }
    }
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}
// 1.5km covers every walk-time band the scorer cares about
fn default_radius_meters() -> u32 {
    1500
}
fn default_overpass_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeSettings {
    /// Absent or empty key disables the narrative service entirely;
    /// analysis then always uses the deterministic fallback.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_narrative_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_narrative_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_narrative_url() -> String {
    "https://api.anthropic.com".to_string()
}
fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}
fn default_max_tokens() -> u32 {
    1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_geocode_ttl")]
    pub geocode_ttl_secs: u64,
    #[serde(default = "default_amenities_ttl")]
    pub amenities_ttl_secs: u64,
    #[serde(default = "default_analysis_ttl")]
    pub analysis_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            geocode_ttl_secs: default_geocode_ttl(),
            amenities_ttl_secs: default_amenities_ttl(),
            analysis_ttl_secs: default_analysis_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    1000
}
fn default_geocode_ttl() -> u64 {
    24 * 60 * 60
}
fn default_amenities_ttl() -> u64 {
    6 * 60 * 60
}
fn default_analysis_ttl() -> u64 {
    60 * 60
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_tracked_categories")]
    pub tracked_categories: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            tracked_categories: default_tracked_categories(),
        }
    }
}

fn default_tracked_categories() -> u32 {
    7
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SITESCORE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SITESCORE_)
            // e.g., SITESCORE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SITESCORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SITESCORE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Fold well-known environment variables into the config
///
/// ANTHROPIC_API_KEY is the conventional spelling; the prefixed form also
/// works.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("ANTHROPIC_API_KEY")
        .or_else(|_| env::var("SITESCORE_NARRATIVE__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = api_key {
        builder = builder.set_override("narrative.api_key", key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings {
            server: ServerSettings::default(),
            geocoder: GeocoderSettings::default(),
            overpass: OverpassSettings::default(),
            narrative: NarrativeSettings::default(),
            cache: CacheSettings::default(),
            scoring: ScoringSettings::default(),
            logging: LoggingSettings::default(),
        };

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.overpass.radius_meters, 1500);
        assert_eq!(settings.scoring.tracked_categories, 7);
        assert_eq!(settings.cache.geocode_ttl_secs, 86_400);
        assert!(settings.narrative.api_key.is_none());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();

        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
