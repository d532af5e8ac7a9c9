//! HTTP transport for gateway calls
//!
//! One request, one response: the transport performs a single attempt per
//! call and never retries. HTTP error statuses still carry a readable
//! gateway body, so they come back as an `Err(Response)` value rather than a
//! hard failure; only transport errors with no body at all surface as
//! [`ApiClientError`].

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use common_utils::{
    masking::{ExposeInterface, Maskable},
    request::{Headers, Method, Request},
    CustomResult,
};
use error_stack::{report, ResultExt};

use crate::{errors::ApiClientError, types::{Proxy, Response}};

/// The seam between the connector and the network. Production uses
/// [`ReqwestTransport`]; tests substitute scripted implementations.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn send(&self, request: Request)
        -> CustomResult<Result<Response, Response>, ApiClientError>;
}

/// [`GatewayTransport`] over a shared `reqwest` client, TLS 1.2 minimum.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(proxy_config: &Proxy) -> CustomResult<Self, ApiClientError> {
        let client = get_client_builder(proxy_config)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)?;
        Ok(Self { client })
    }
}

fn get_client_builder(proxy_config: &Proxy) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .use_rustls_tls()
        .min_tls_version(reqwest::tls::Version::TLS_1_2);

    if let Some(timeout) = proxy_config.idle_pool_connection_timeout {
        client_builder = client_builder.pool_idle_timeout(Duration::from_secs(timeout));
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url).change_context(ApiClientError::InvalidProxyConfiguration)?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url).change_context(ApiClientError::InvalidProxyConfiguration)?,
        );
    }

    Ok(client_builder)
}

#[async_trait]
impl GatewayTransport for ReqwestTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        let url =
            reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

        let headers = request.headers.construct_header_map()?;

        let request_builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => {
                let builder = self.client.post(url);
                match request.body {
                    Some(body) => builder.body(body.get_inner_value().expose()),
                    None => builder,
                }
            }
        }
        .headers(headers);

        let response = request_builder.send().await.map_err(|error| {
            let api_error = if error.is_timeout() {
                ApiClientError::RequestTimeoutReceived
            } else {
                ApiClientError::RequestNotSent(error.to_string())
            };
            tracing::error!(?api_error, "unable to send request to the gateway");
            report!(api_error)
        })?;

        handle_response(response).await
    }
}

async fn handle_response(
    response: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = response.status().as_u16();
    match status_code {
        200..=202 | 204 | 302 => {
            let body = response
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                response: body,
                status_code,
            }))
        }
        400..=599 => {
            let body = response
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Err(Response {
                response: body,
                status_code,
            }))
        }
        _ => {
            tracing::error!(status_code, "unexpected response from the gateway");
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let is_sensitive = matches!(header_value, Maskable::Masked(_));
                let mut header_value = HeaderValue::from_str(&header_value.into_inner())
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_value.set_sensitive(is_sensitive);
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}
