use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Placeholder tokens substituted into `ingestion.url_template`.
pub const SPACE_ID_PLACEHOLDER: &str = "CONTENTFUL_SPACE_ID";
pub const ENVIRONMENT_PLACEHOLDER: &str = "CONTENTFUL_ENVIRONMENT";
pub const ACCESS_TOKEN_PLACEHOLDER: &str = "CONTENTFUL_ACCESS_TOKEN";
pub const CONTENT_TYPE_PLACEHOLDER: &str = "CONTENTFUL_CONTENT_TYPE";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Fetch every minute from a fixed moment instead of hourly from "now - 1h".
    #[serde(default)]
    pub test_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_true")]
    pub serve_docs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4), serve_docs: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Guard product/report routes with `Authorization: Bearer <token>`.
    #[serde(default)]
    pub require_token: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: default_jwt_secret(), token_ttl_secs: default_token_ttl(), require_token: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// URL with the four `CONTENTFUL_*` placeholder tokens.
    #[serde(default)]
    pub url_template: String,
    #[serde(default)]
    pub space_id: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub content_type: String,
    /// Cron expression with a seconds field; derived from `test_mode` when absent.
    #[serde(default)]
    pub schedule: Option<String>,
    /// Lower bound for `sys.createdAt` in test mode.
    #[serde(default = "default_fixed_since")]
    pub fixed_since: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: String::new(),
            space_id: String::new(),
            environment: String::new(),
            access_token: String::new(),
            content_type: String::new(),
            schedule: None,
            fixed_since: default_fixed_since(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self { Self { page_size: default_page_size() } }
}

fn default_true() -> bool { true }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_jwt_secret() -> String { "dev-secret-change-me".into() }
fn default_token_ttl() -> u64 { 3600 }
fn default_fixed_since() -> String { "2024-01-23T21:47:00.000Z".into() }
fn default_request_timeout() -> u64 { 30 }
fn default_page_size() -> u64 { 5 }

pub const HOURLY_SCHEDULE: &str = "0 0 * * * *";
pub const EVERY_MINUTE_SCHEDULE: &str = "0 * * * * *";

/// Load `config.toml` (or `CONFIG_PATH`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File, then process environment, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay values from an environment lookup. Unset or unparsable keys are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(h) = lookup("SERVER_HOST") { self.server.host = h; }
        if let Some(p) = lookup("PORT").or_else(|| lookup("SERVER_PORT")).and_then(|p| p.parse().ok()) {
            self.server.port = p;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(b) = lookup("SERVE_DOCS").and_then(|v| parse_flag(&v)) { self.server.serve_docs = b; }

        self.database.normalize_from_env(&lookup);

        if let Some(s) = lookup("JWT_SECRET") { self.auth.jwt_secret = s; }
        if let Some(b) = lookup("REQUIRE_TOKEN").and_then(|v| parse_flag(&v)) { self.auth.require_token = b; }

        let ing = &mut self.ingestion;
        if let Some(b) = lookup("INGESTION_ENABLED").and_then(|v| parse_flag(&v)) { ing.enabled = b; }
        if let Some(v) = lookup("CONTENTFUL_URL") { ing.url_template = v; }
        if let Some(v) = lookup(SPACE_ID_PLACEHOLDER) { ing.space_id = v; }
        if let Some(v) = lookup(ENVIRONMENT_PLACEHOLDER) { ing.environment = v; }
        if let Some(v) = lookup(ACCESS_TOKEN_PLACEHOLDER) { ing.access_token = v; }
        if let Some(v) = lookup(CONTENT_TYPE_PLACEHOLDER) { ing.content_type = v; }
        if let Some(v) = lookup("INGESTION_SCHEDULE") { ing.schedule = Some(v); }

        if let Some(n) = lookup("MAX_ITEMS_PER_PAGE").and_then(|v| v.parse().ok()) {
            self.pagination.page_size = n;
        }
        // Test mode is opt-in: an unset TESTMODE keeps the hourly production cadence.
        if let Some(v) = lookup("TESTMODE") {
            self.test_mode = v.trim().eq_ignore_ascii_case("yes");
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret must not be empty"));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        if self.pagination.page_size == 0 {
            return Err(anyhow!("pagination.page_size must be >= 1"));
        }
        if self.ingestion.enabled && self.ingestion.url_template.trim().is_empty() {
            return Err(anyhow!("ingestion.url_template is empty; set it in config.toml or CONTENTFUL_URL"));
        }
        Ok(())
    }

    /// Cron expression driving the ingestion job.
    pub fn ingestion_schedule(&self) -> &str {
        match &self.ingestion.schedule {
            Some(s) if !s.trim().is_empty() => s.as_str(),
            _ if self.test_mode => EVERY_MINUTE_SCHEDULE,
            _ => HOURLY_SCHEDULE,
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Override `url` with `DATABASE_URL`, or with one assembled from `DB_HOST`/
    /// `DB_PORT`/`DB_USERNAME`/`DB_PASSWORD`/`DB_DATABASE`. The file value stays
    /// only when neither is set.
    pub fn normalize_from_env<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            self.url = url;
            return;
        }
        if let Some(host) = lookup("DB_HOST") {
            let port = lookup("DB_PORT").unwrap_or_else(|| "5432".into());
            let user = lookup("DB_USERNAME").unwrap_or_else(|| "postgres".into());
            let password = lookup("DB_PASSWORD").unwrap_or_default();
            let name = lookup("DB_DATABASE").unwrap_or_else(|| "products".into());
            self.url = format!(
                "postgres://{}:{}@{host}:{port}/{}",
                urlencoding::encode(&user),
                urlencoding::encode(&password),
                urlencoding::encode(&name),
            );
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL or DB_HOST"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
