use std::{env, fmt, str::FromStr, time::Duration};

/// Deployment profile; selects the log format and default verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnv {
    /// Human-readable logs at debug.
    #[default]
    Local,
    /// JSON logs at debug.
    Dev,
    /// JSON logs at info.
    Prod,
}

impl FromStr for AppEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "" => Ok(AppEnv::Local),
            "dev" => Ok(AppEnv::Dev),
            "prod" => Ok(AppEnv::Prod),
            other => Err(format!("unknown APP_ENV `{other}`")),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppEnv::Local => "local",
            AppEnv::Dev => "dev",
            AppEnv::Prod => "prod",
        })
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment profile (default: local)
    pub app_env: AppEnv,
    /// Store driver; only "sqlite" is supported (default: "sqlite")
    pub db_driver: String,
    /// Path to SQLite database file (default: "peoples.db")
    pub db_url: String,
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of in-memory cache entries (default: 10,000)
    #[cfg_attr(not(feature = "memory"), allow(dead_code))]
    pub cache_max_entries: usize,
    /// Redis host:port (default: "localhost:6379")
    /// Note: Redis fields are only used when the `redis` feature is enabled.
    #[cfg_attr(not(feature = "redis"), allow(dead_code))]
    pub redis_address: String,
    /// Redis password (default: empty)
    #[cfg_attr(not(feature = "redis"), allow(dead_code))]
    pub redis_password: String,
    /// Redis logical database (default: 0)
    #[cfg_attr(not(feature = "redis"), allow(dead_code))]
    pub redis_db: u32,
    /// Kafka bootstrap servers (default: "localhost:9092")
    /// Note: This and the fields below up to `ingest_max_in_flight` are only
    /// read by `peoples ingest`, which needs the `kafka` feature.
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub kafka_address: String,
    /// Topic carrying enrichment requests (default: "peoples")
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub kafka_consumer_topic: String,
    /// Consumer group id (default: "peoples")
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub kafka_consumer_group: String,
    /// Topic receiving failure records (default: "peoples_failed")
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub kafka_producer_topic: String,
    /// Poll timeout in milliseconds (default: 100)
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub kafka_timeout_ms: u64,
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub age_api_url: String,
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub gender_api_url: String,
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub nation_api_url: String,
    /// Per-request timeout for inference calls in milliseconds (default: 5,000)
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub inference_timeout_ms: u64,
    /// Optional bound on concurrently processed messages (default: unbounded)
    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub ingest_max_in_flight: Option<usize>,
    /// Graceful shutdown deadline in seconds (default: 10)
    pub shutdown_timeout_seconds: u64,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            app_env: parse_or("APP_ENV", AppEnv::Local),
            db_driver: var_or("DB_DRIVER", "sqlite"),
            db_url: var_or("DB_URL", "peoples.db"),
            cache_ttl_seconds: parse_or("CACHE_TTL_SECONDS", 300),
            cache_max_entries: parse_or("CACHE_MAX_ENTRIES", 10_000),
            redis_address: var_or("REDIS_ADDRESS", "localhost:6379"),
            redis_password: var_or("REDIS_PASSWORD", ""),
            redis_db: parse_or("REDIS_DB", 0),
            kafka_address: var_or("KAFKA_ADDRESS", "localhost:9092"),
            kafka_consumer_topic: var_or("KAFKA_CONSUMER_TOPIC", "peoples"),
            kafka_consumer_group: var_or("KAFKA_CONSUMER_GROUP", "peoples"),
            kafka_producer_topic: var_or("KAFKA_PRODUCER_TOPIC", "peoples_failed"),
            kafka_timeout_ms: parse_or("KAFKA_TIMEOUT", 100),
            age_api_url: var_or("AGE_API_URL", "https://api.agify.io"),
            gender_api_url: var_or("GENDER_API_URL", "https://api.genderize.io"),
            nation_api_url: var_or("NATION_API_URL", "https://api.nationalize.io"),
            inference_timeout_ms: parse_or("INFERENCE_TIMEOUT_MS", 5_000),
            ingest_max_in_flight: env::var("INGEST_MAX_IN_FLIGHT")
                .ok()
                .and_then(|v| v.parse().ok()),
            shutdown_timeout_seconds: parse_or("SHUTDOWN_TIMEOUT_SECONDS", 10),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Redis connection URL built from address, password and database.
    #[cfg_attr(not(feature = "redis"), allow(dead_code))]
    pub fn redis_url(&self) -> String {
        if self.redis_password.is_empty() {
            format!("redis://{}/{}", self.redis_address, self.redis_db)
        } else {
            format!(
                "redis://:{}@{}/{}",
                self.redis_password, self.redis_address, self.redis_db
            )
        }
    }

    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.kafka_timeout_ms)
    }

    #[cfg_attr(not(feature = "kafka"), allow(dead_code))]
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}
