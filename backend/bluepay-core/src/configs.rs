//! Application configuration for the gateway client

use std::path::Path;

use common_utils::{masking::Secret, CustomResult};
use error_stack::ResultExt;
use serde::Deserialize;

use crate::{
    errors::ConfigurationError,
    types::{ConnectorParams, Proxy},
};

/// Settings for one gateway account. Loaded from an optional config file
/// overlaid with `BLUEPAY_`-prefixed environment variables
/// (e.g. `BLUEPAY_SECRET_KEY`, `BLUEPAY_CONNECTOR__BASE_URL`).
#[derive(Clone, Debug, Deserialize)]
pub struct BluepaySettings {
    pub account_id: Secret<String>,
    pub user_id: Secret<String>,
    pub secret_key: Secret<String>,
    #[serde(default)]
    pub sandbox: bool,
    #[serde(default)]
    pub connector: ConnectorParams,
    #[serde(default)]
    pub proxy: Proxy,
}

impl BluepaySettings {
    pub fn load(config_path: Option<&Path>) -> CustomResult<Self, ConfigurationError> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(config::Environment::with_prefix("BLUEPAY").separator("__"))
            .build()
            .change_context(ConfigurationError::ConfigBuildFailed)?
            .try_deserialize()
            .change_context(ConfigurationError::ConfigParseFailed)
    }
}
