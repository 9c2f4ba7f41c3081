use crate::application::analytics_repository::Endpoint;
use crate::domain::theme::ThemeName;
use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub theme: ThemeName,
    pub endpoints: EndpointTemplates,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// URL templates; `${base}` expands to `api.base_url`.
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointTemplates {
    pub traffic: String,
    pub categories: String,
    pub radar: String,
    pub heatmap: String,
    pub recent_reports: String,
    pub sources: String,
}

impl EndpointTemplates {
    pub fn template(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Traffic => &self.traffic,
            Endpoint::Categories => &self.categories,
            Endpoint::Radar => &self.radar,
            Endpoint::Heatmap => &self.heatmap,
            Endpoint::RecentReports => &self.recent_reports,
            Endpoint::Sources => &self.sources,
        }
    }
}

impl DashboardConfig {
    pub fn endpoint_urls(&self) -> HashMap<Endpoint, String> {
        let mut vars = HashMap::new();
        vars.insert(
            "base".to_string(),
            self.api.base_url.trim_end_matches('/').to_string(),
        );
        Endpoint::ALL
            .into_iter()
            .map(|e| (e, prepare_endpoint(self.endpoints.template(e), &vars)))
            .collect()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("api.base_url", "http://127.0.0.1:8000")?
        .set_default("api.timeout_secs", 10)?
        .set_default("theme", "dark")?
        .set_default("endpoints.traffic", "${base}/api/v1/trends/traffic")?
        .set_default("endpoints.categories", "${base}/api/v1/dashboard/categories")?
        .set_default("endpoints.radar", "${base}/api/v1/trends/radar")?
        .set_default("endpoints.heatmap", "${base}/api/v1/dashboard/heatmap")?
        .set_default("endpoints.recent_reports", "${base}/api/v1/dashboard/recentReports")?
        .set_default("endpoints.sources", "${base}/api/v1/trends/sources")
}

/// `config/dashboard.toml` (optional) overridden by `DASHBOARD_*` variables,
/// e.g. `DASHBOARD_API__BASE_URL`.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .context("Failed to load dashboard configuration")?;

    settings
        .try_deserialize()
        .context("Invalid dashboard configuration")
}

/// Replace template variables in an endpoint URL
pub fn prepare_endpoint(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_prepare_endpoint() {
        let mut vars = HashMap::new();
        vars.insert("base".to_string(), "http://api.local".to_string());

        let result = prepare_endpoint("${base}/api/v1/trends/radar?since=${days}", &vars);

        assert_eq!(result, "http://api.local/api/v1/trends/radar?since=${days}");
    }

    #[test]
    fn test_defaults_and_overrides() {
        let settings = defaults()
            .unwrap()
            .add_source(File::from_str(
                "theme = \"light\"\n[api]\nbase_url = \"https://example.org/\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: DashboardConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.theme, ThemeName::Light);

        let urls = config.endpoint_urls();
        assert_eq!(
            urls[&Endpoint::RecentReports],
            "https://example.org/api/v1/dashboard/recentReports"
        );
        assert_eq!(urls.len(), Endpoint::ALL.len());
    }
}
