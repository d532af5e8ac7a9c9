//! Error taxonomy for the gateway client

/// Failures inside the connector layer: request construction, signing and
/// response interpretation. Gateway declines are not errors; they surface as
/// typed results.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Failed to encode the gateway request")]
    RequestEncodingFailed,
    #[error("Failed to convert the amount to the gateway representation")]
    AmountConversionFailed,
    #[error("Failed to deserialize the gateway response")]
    ResponseDeserializationFailed,
    #[error("Failed to complete the gateway processing step")]
    ProcessingStepFailed,
    #[error("Webhook source verification failed")]
    WebhookSourceVerificationFailed,
    #[error("Failed to decode the webhook body")]
    WebhookBodyDecodingFailed,
}

/// Transport-level failures where no gateway response body exists. These
/// propagate as hard failures; anything with a readable body is folded into
/// the response map instead.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("Failed to construct the HTTP client")]
    ClientConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Failed to construct the request header map")]
    HeaderMapConstructionFailed,
    #[error("The request URL is malformed")]
    UrlEncodingFailed,
    #[error("Request timed out before a response was received")]
    RequestTimeoutReceived,
    #[error("Failed to send the request: {0}")]
    RequestNotSent(String),
    #[error("Failed to read the response body")]
    ResponseDecodingFailed,
    #[error("Unexpected response status from the gateway")]
    UnexpectedServerResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to build the application configuration")]
    ConfigBuildFailed,
    #[error("Failed to deserialize the application configuration")]
    ConfigParseFailed,
}
