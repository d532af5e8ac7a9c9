//! Endpoint parameters, proxy settings and the raw transport response

use serde::Deserialize;

/// Gateway endpoints. The defaults point at the production hosts; the
/// sandbox is selected through the `MODE` request field, not a separate URL.
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectorParams {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_rebill_admin_url")]
    pub rebill_admin_url: String,
}

fn default_base_url() -> String {
    "https://secure.bluepay.com/interfaces/bp20post".to_string()
}

fn default_rebill_admin_url() -> String {
    "https://secure.bluepay.com/interfaces/bp20rebadmin".to_string()
}

impl Default for ConnectorParams {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            rebill_admin_url: default_rebill_admin_url(),
        }
    }
}

/// Outbound proxy configuration for the HTTP client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
}

/// A raw response read back from the gateway, success or error alike.
#[derive(Clone, Debug)]
pub struct Response {
    pub response: bytes::Bytes,
    pub status_code: u16,
}
