use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::features::heatmap::models::{DecayConfig, HeatLayerOptions};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    /// `None` runs the service on the in-memory report store
    pub database: Option<DatabaseConfig>,
    pub swagger: SwaggerConfig,
    pub minio: MinIOConfig,
    pub heatmap: HeatmapConfig,
    /// `None` disables AI location refinement and photo classification
    pub vision: Option<VisionConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// MinIO/S3 storage configuration for report photos
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Endpoint used in returned photo URLs (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Key prefix for publicly readable photos
    pub public_prefix: String,
}

/// Decay policy and rendering options for the heat layer
#[derive(Debug, Clone)]
pub struct HeatmapConfig {
    pub decay: DecayConfig,
    pub layer: HeatLayerOptions,
    /// Timer-driven recompute period; decay resolution is whole days
    pub refresh_interval: Duration,
}

/// Gemini vision assistant configuration
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Refinements moving the point farther than this are discarded
    pub max_refinement_meters: f64,
}

/// Read an env var, falling back to a default, and parse it
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            heatmap: HeatmapConfig::from_env()?,
            vision: VisionConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 12 * 1024 * 1024; // photo + form fields

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size =
            parse_env("MAX_REQUEST_BODY_SIZE", Self::DEFAULT_MAX_REQUEST_BODY_SIZE)?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Option<Self>, String> {
        let Some(url) = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        Ok(Some(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        }))
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Vigilantes del Aedes API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Breeding-site reports and criticality heatmap for Aedes aegypti surveillance"
                .to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key: env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            bucket: env::var("MINIO_BUCKET").unwrap_or_else(|_| "reports".to_string()),
            region: env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            public_prefix: env::var("MINIO_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "public".to_string()),
        })
    }
}

impl HeatmapConfig {
    const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

    pub fn from_env() -> Result<Self, String> {
        let defaults = DecayConfig::default();
        let decay = DecayConfig::new(
            parse_env("HEATMAP_DAILY_INCREMENT", defaults.daily_increment)?,
            parse_env("HEATMAP_MAX_WEIGHT", defaults.max_weight)?,
        )
        .map_err(|e| e.to_string())?;

        let layer_defaults = HeatLayerOptions::default();
        let layer = HeatLayerOptions {
            radius: parse_env("HEATMAP_RADIUS", layer_defaults.radius)?,
            blur: parse_env("HEATMAP_BLUR", layer_defaults.blur)?,
            max_zoom: parse_env("HEATMAP_MAX_ZOOM", layer_defaults.max_zoom)?,
            ..layer_defaults
        };

        let refresh_secs = parse_env(
            "HEATMAP_REFRESH_INTERVAL_SECS",
            Self::DEFAULT_REFRESH_INTERVAL_SECS,
        )?;
        if refresh_secs == 0 {
            return Err("HEATMAP_REFRESH_INTERVAL_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            decay,
            layer,
            refresh_interval: Duration::from_secs(refresh_secs),
        })
    }
}

impl VisionConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_MAX_REFINEMENT_METERS: f64 = 250.0;

    pub fn from_env() -> Result<Option<Self>, String> {
        let Some(api_key) = env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let max_refinement_meters = parse_env(
            "VISION_MAX_REFINEMENT_METERS",
            Self::DEFAULT_MAX_REFINEMENT_METERS,
        )?;
        if !max_refinement_meters.is_finite() || max_refinement_meters <= 0.0 {
            return Err("VISION_MAX_REFINEMENT_METERS must be a positive number".to_string());
        }

        Ok(Some(Self {
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            timeout: Duration::from_secs(parse_env(
                "VISION_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )?),
            max_refinement_meters,
        }))
    }
}
