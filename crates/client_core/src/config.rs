use std::{fs, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use url::Url;

use crate::{
    order::CheckoutPolicy,
    past_orders::{DEFAULT_PAGE_SIZE, DEFAULT_STALE_AFTER},
};

pub const SETTINGS_FILE: &str = "pizza_client.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub past_orders_page_size: usize,
    pub past_orders_stale_after: Duration,
    pub checkout_policy: CheckoutPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".into(),
            past_orders_page_size: DEFAULT_PAGE_SIZE,
            past_orders_stale_after: DEFAULT_STALE_AFTER,
            checkout_policy: CheckoutPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    past_orders_page_size: Option<usize>,
    past_orders_stale_secs: Option<u64>,
    checkout_policy: Option<String>,
}

impl Settings {
    /// Replaces the base URL, validated the same way as a configured one.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

/// Defaults, then `pizza_client.toml` in the working directory, then the
/// environment, then `api_base_url_override` (e.g. a command-line flag).
pub fn load_settings(api_base_url_override: Option<&str>) -> Result<Settings> {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    let settings = settings_from_sources(file.as_deref(), |key| std::env::var(key).ok())?;
    match api_base_url_override {
        Some(url) => settings.with_api_base_url(url),
        None => Ok(settings),
    }
}

pub fn settings_from_sources(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        let file_cfg: FileSettings =
            toml::from_str(raw).with_context(|| format!("failed to parse {SETTINGS_FILE}"))?;
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = v;
        }
        if let Some(v) = file_cfg.past_orders_page_size {
            settings.past_orders_page_size = v;
        }
        if let Some(v) = file_cfg.past_orders_stale_secs {
            settings.past_orders_stale_after = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.checkout_policy {
            settings.checkout_policy = v.parse()?;
        }
    }

    if let Some(v) = env("PIZZA_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__PAST_ORDERS_PAGE_SIZE") {
        settings.past_orders_page_size = v
            .parse()
            .with_context(|| format!("invalid APP__PAST_ORDERS_PAGE_SIZE '{v}'"))?;
    }
    if let Some(v) = env("APP__PAST_ORDERS_STALE_SECS") {
        let secs: u64 = v
            .parse()
            .with_context(|| format!("invalid APP__PAST_ORDERS_STALE_SECS '{v}'"))?;
        settings.past_orders_stale_after = Duration::from_secs(secs);
    }
    if let Some(v) = env("APP__CHECKOUT_POLICY") {
        settings.checkout_policy = v.parse()?;
    }

    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    if settings.past_orders_page_size == 0 {
        return Err(anyhow!("past orders page size must be at least 1"));
    }

    Ok(settings)
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed =
        Url::parse(raw.trim()).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "api base url must use http or https, got '{}'",
            parsed.scheme()
        ));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
