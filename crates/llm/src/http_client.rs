//! HTTP Client Factory
//!
//! Builds reqwest clients with the configured timeout and optional proxy.

use std::time::Duration;

use ghostline_core::proxy::ProxyConfig;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` for backend calls.
///
/// - `Some(proxy)` -> route all requests through the proxy
/// - `None` -> explicitly disable proxies (`no_proxy`), ignoring env vars
pub fn build_http_client(proxy: Option<&ProxyConfig>, timeout_secs: u64) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));
    match proxy {
        Some(cfg) => {
            let mut p = reqwest::Proxy::all(cfg.url()).map_err(|e| LlmError::InvalidRequest {
                message: format!("Invalid proxy {}: {}", cfg.url(), e),
            })?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    builder.build().map_err(|e| LlmError::Other {
        message: format!("Failed to build HTTP client: {}", e),
    })
}
