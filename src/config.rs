use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BCRA_BASE_URL: &str = "https://api.bcra.gob.ar/centraldedeudores/v1.0";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; BCRA-Consulta/1.0)";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Central de Deudores API root, without trailing `/Deudas`.
    pub bcra_base_url: String,
    pub bcra_user_agent: String,
    pub bcra_timeout_secs: u64,
    /// Pause between consecutive lookups in a batch.
    pub query_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            bcra_base_url: DEFAULT_BCRA_BASE_URL.to_string(),
            bcra_user_agent: DEFAULT_USER_AGENT.to_string(),
            bcra_timeout_secs: 30,
            query_delay_ms: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("BCRA Base URL: {}", config.bcra_base_url);
        tracing::debug!("Query delay: {}ms", config.query_delay_ms);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: var("PORT")
                .map(|p| p.trim().parse())
                .transpose()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?
                .unwrap_or(defaults.port),
            bcra_base_url: var("BCRA_BASE_URL")
                .map(|url| {
                    let url = url.trim().trim_end_matches('/').to_string();
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("BCRA_BASE_URL must start with http:// or https://");
                    }
                    url::Url::parse(&url)
                        .map_err(|e| anyhow::anyhow!("BCRA_BASE_URL is not a valid URL: {}", e))?;
                    Ok(url)
                })
                .transpose()?
                .unwrap_or(defaults.bcra_base_url),
            bcra_user_agent: var("BCRA_USER_AGENT").unwrap_or(defaults.bcra_user_agent),
            bcra_timeout_secs: var("BCRA_TIMEOUT_SECS")
                .map(|t| {
                    let secs: u64 = t
                        .trim()
                        .parse()
                        .map_err(|_| anyhow::anyhow!("BCRA_TIMEOUT_SECS must be a number"))?;
                    if secs == 0 {
                        anyhow::bail!("BCRA_TIMEOUT_SECS must be greater than 0");
                    }
                    Ok(secs)
                })
                .transpose()?
                .unwrap_or(defaults.bcra_timeout_secs),
            query_delay_ms: var("QUERY_DELAY_MS")
                .map(|d| d.trim().parse())
                .transpose()
                .map_err(|_| anyhow::anyhow!("QUERY_DELAY_MS must be a number of milliseconds"))?
                .unwrap_or(defaults.query_delay_ms),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.bcra_timeout_secs)
    }

    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }
}
