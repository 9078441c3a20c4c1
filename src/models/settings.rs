//! Settings Models
//!
//! Application configuration and settings data structures.

use std::path::PathBuf;

use ghostline_core::ProxyConfig;
use ghostline_llm::{ProviderConfig, ProviderType};
use serde::{Deserialize, Serialize};

/// Environment variables that override the stored configuration.
pub const ENV_AI_BACKEND: &str = "GHOSTLINE_AI_BACKEND";
pub const ENV_AI_ENDPOINT: &str = "GHOSTLINE_AI_ENDPOINT";
pub const ENV_AI_MODEL: &str = "GHOSTLINE_AI_MODEL";
pub const ENV_AI_API_KEY: &str = "GHOSTLINE_AI_API_KEY";
pub const ENV_AI_PROXY_PASSWORD: &str = "GHOSTLINE_AI_PROXY_PASSWORD";

/// Application configuration stored in config.json
///
/// Missing keys fall back to their defaults so older files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// AI backend: "echo", "ollama", or "openai"
    pub ai_backend: String,
    /// Base URL of the backend; empty means the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_endpoint: Option<String>,
    /// Model name sent to the backend
    pub ai_model: String,
    /// API key, only ever read from the environment or set at runtime
    #[serde(default, skip_serializing)]
    pub ai_api_key: Option<String>,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Proxy for backend requests; `None` disables proxies entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Maximum number of agents running at once
    pub max_agent_workers: usize,
    /// Override for the workspace memory file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_file: Option<PathBuf>,
    /// Enable debug mode
    pub debug_mode: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai_backend: "echo".to_string(),
            ai_endpoint: None,
            ai_model: "codellama".to_string(),
            ai_api_key: None,
            temperature: 0.2,
            request_timeout_secs: 60,
            proxy: None,
            max_agent_workers: 4,
            memory_file: None,
            debug_mode: false,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub ai_backend: Option<String>,
    pub ai_endpoint: Option<String>,
    pub ai_model: Option<String>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
    pub proxy: Option<ProxyConfig>,
    /// Remove the configured proxy
    #[serde(default)]
    pub clear_proxy: bool,
    pub max_agent_workers: Option<usize>,
    pub memory_file: Option<PathBuf>,
    pub debug_mode: Option<bool>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(backend) = update.ai_backend {
            self.ai_backend = backend;
        }
        if let Some(endpoint) = update.ai_endpoint {
            // An empty string clears the override
            self.ai_endpoint = Some(endpoint).filter(|e| !e.trim().is_empty());
        }
        if let Some(model) = update.ai_model {
            self.ai_model = model;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if update.clear_proxy {
            self.proxy = None;
        }
        if let Some(proxy) = update.proxy {
            self.proxy = Some(proxy);
        }
        if let Some(workers) = update.max_agent_workers {
            self.max_agent_workers = workers;
        }
        if let Some(path) = update.memory_file {
            self.memory_file = Some(path);
        }
        if let Some(debug) = update.debug_mode {
            self.debug_mode = debug;
        }
    }

    /// Overlay `GHOSTLINE_AI_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overlay `GHOSTLINE_AI_*` variables using `lookup`. Empty values are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get(ENV_AI_BACKEND) {
            self.ai_backend = backend;
        }
        if let Some(endpoint) = get(ENV_AI_ENDPOINT) {
            self.ai_endpoint = Some(endpoint);
        }
        if let Some(model) = get(ENV_AI_MODEL) {
            self.ai_model = model;
        }
        if let Some(key) = get(ENV_AI_API_KEY) {
            self.ai_api_key = Some(key);
        }
        if let (Some(proxy), Some(password)) = (self.proxy.as_mut(), get(ENV_AI_PROXY_PASSWORD)) {
            proxy.password = Some(password);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ai_backend.parse::<ProviderType>().is_err() {
            return Err(format!(
                "Invalid ai_backend: {}. Must be 'echo', 'ollama', or 'openai'",
                self.ai_backend
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".to_string());
        }

        if self.max_agent_workers == 0 {
            return Err("max_agent_workers must be at least 1".to_string());
        }

        if let Some(proxy) = &self.proxy {
            if proxy.host.trim().is_empty() || proxy.port == 0 {
                return Err(format!("Invalid proxy: {}", proxy.url()));
            }
        }

        Ok(())
    }

    /// Backend configuration for the AI client.
    pub fn provider_config(&self) -> Result<ProviderConfig, String> {
        let provider = self
            .ai_backend
            .parse::<ProviderType>()
            .map_err(|e| e.to_string())?;

        Ok(ProviderConfig {
            provider,
            endpoint: self.ai_endpoint.clone(),
            model: self.ai_model.clone(),
            api_key: self.ai_api_key.clone(),
            temperature: self.temperature,
            timeout_secs: self.request_timeout_secs,
            proxy: self.proxy.clone(),
        })
    }
}
