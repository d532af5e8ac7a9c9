//! The BluePay 2.0 connector
//!
//! Request construction, the tamper-proof seal, submission and response
//! interpretation for the primary transaction endpoint and the rebill
//! administration endpoint. Every operation builds its field set fresh, so
//! concurrent calls on the same client never share request state.

pub mod transformers;

mod test;

use std::sync::Arc;

use common_enums::AttemptStatus;
use common_utils::{
    request::{Method, Request, RequestBuilder, RequestContent},
    CustomResult,
};
use error_stack::ResultExt;
use tracing::field::Empty;
use transformers::{
    self as bluepay, AdminVerb, BluepayAuthType, BluepayCaptureRequest, BluepayMode,
    BluepayPaymentsRequest, BluepayRebillAdminRequest, BluepayRebillAdminResponse,
    BluepayRefundRequest, BluepayRouterData, BluepayVoidRequest, FormResponse, NotificationParams,
    PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResult,
    RebillCancelResult, RefundsData, RefundsResult,
};

use crate::{
    configs::BluepaySettings,
    errors::{ApiClientError, ConnectorError},
    service::{GatewayTransport, ReqwestTransport},
    types::ConnectorParams,
};

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const USER_AGENT: &str = "User-Agent";
}

pub(crate) mod constants {
    pub const PROTOCOL_VERSION: &str = "3";
    pub const TPS_DEF: &str = "ACCOUNT_ID MODE TRANS_TYPE AMOUNT MASTER_ID";
    pub const PAYMENT_TYPE_CREDIT: &str = "CREDIT";
    pub const DO_REBILL: &str = "1";
    pub const REBILL_STOP_STATUS: &str = "STOPPED";
    pub const STATUS_APPROVED: &str = "1";
    pub const STATUS_DECLINED: &str = "0";
    pub const DUPLICATE_MESSAGE: &str = "DUPLICATE";
    pub const BP_STAMP_FIELD: &str = "BP_STAMP";
    pub const BP_STAMP_DEF_FIELD: &str = "BP_STAMP_DEF";
    pub const NOTIFICATION_REBILL_ID_FIELD: &str = "rebill_id";
    pub const NOTIFICATION_STATUS_FIELD: &str = "status";
    pub const USER_AGENT: &str = "bluepay-core";
}

/// A configured gateway client. Credentials and mode are immutable for the
/// lifetime of the instance.
pub struct Bluepay {
    auth: BluepayAuthType,
    mode: BluepayMode,
    params: ConnectorParams,
    transport: Arc<dyn GatewayTransport>,
}

impl Bluepay {
    pub fn new(auth: BluepayAuthType, mode: BluepayMode) -> CustomResult<Self, ApiClientError> {
        let transport = ReqwestTransport::new(&Default::default())?;
        Ok(Self::with_transport(
            auth,
            mode,
            ConnectorParams::default(),
            Arc::new(transport),
        ))
    }

    pub fn from_settings(settings: &BluepaySettings) -> CustomResult<Self, ApiClientError> {
        let auth = BluepayAuthType::new(
            settings.account_id.clone(),
            settings.user_id.clone(),
            settings.secret_key.clone(),
        );
        let mode = if settings.sandbox {
            BluepayMode::Test
        } else {
            BluepayMode::Live
        };
        let transport = ReqwestTransport::new(&settings.proxy)?;
        Ok(Self::with_transport(
            auth,
            mode,
            settings.connector.clone(),
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        auth: BluepayAuthType,
        mode: BluepayMode,
        params: ConnectorParams,
        transport: Arc<dyn GatewayTransport>,
    ) -> Self {
        Self {
            auth,
            mode,
            params,
            transport,
        }
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }

    fn router_data<T>(&self, request: T) -> BluepayRouterData<'_, T> {
        BluepayRouterData {
            auth: &self.auth,
            mode: self.mode,
            request,
        }
    }

    fn build_request(&self, url: &str, body: RequestContent) -> Request {
        RequestBuilder::new()
            .method(Method::Post)
            .url(url)
            .header(headers::CONTENT_TYPE, self.common_get_content_type())
            .header(headers::USER_AGENT, constants::USER_AGENT)
            .set_body(body)
            .build()
    }

    /// Single submission to the gateway. HTTP error bodies are decoded
    /// through the same form parser; when such a body carries no MESSAGE the
    /// transport status is substituted so callers always get a diagnostic.
    #[tracing::instrument(
        name = "bluepay_gateway_call",
        skip_all,
        fields(request.url = %url, response.status_code = Empty)
    )]
    async fn submit<R: FormResponse>(
        &self,
        url: &str,
        body: RequestContent,
    ) -> CustomResult<(R, u16), ConnectorError> {
        let request = self.build_request(url, body);
        let result = self
            .transport
            .send(request)
            .await
            .change_context(ConnectorError::ProcessingStepFailed)?;

        let (body, status_code, transport_failed) = match result {
            Ok(response) => (response.response, response.status_code, false),
            Err(response) => (response.response, response.status_code, true),
        };
        tracing::Span::current().record(
            "response.status_code",
            tracing::field::display(status_code),
        );

        let mut response: R = serde_urlencoded::from_bytes(&body)
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        if transport_failed {
            let message = response.message_mut();
            if message.as_deref().unwrap_or_default().is_empty() {
                *message = Some(format!("HTTP error status {status_code}"));
            }
            tracing::warn!(status_code, "gateway returned an error response body");
        }
        Ok((response, status_code))
    }

    /// Authorization, or sale when capture is automatic. A request carrying
    /// a rebill schedule opens the recurring sequence in the same call.
    pub async fn authorize(
        &self,
        data: &PaymentsAuthorizeData,
    ) -> CustomResult<PaymentsResult, ConnectorError> {
        let success_status = if data.is_auto_capture() {
            AttemptStatus::Charged
        } else {
            AttemptStatus::Authorized
        };
        let connector_req = BluepayPaymentsRequest::try_from(self.router_data(data))?;
        let body = RequestContent::form_urlencoded(&connector_req)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let (response, status_code) = self.submit(&self.params.base_url, body).await?;
        Ok(bluepay::payments_result(
            response,
            status_code,
            success_status,
            AttemptStatus::Failure,
        ))
    }

    /// Capture of a prior authorization.
    pub async fn capture(
        &self,
        data: &PaymentsCaptureData,
    ) -> CustomResult<PaymentsResult, ConnectorError> {
        let connector_req = BluepayCaptureRequest::try_from(self.router_data(data))?;
        let body = RequestContent::form_urlencoded(&connector_req)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let (response, status_code) = self.submit(&self.params.base_url, body).await?;
        Ok(bluepay::payments_result(
            response,
            status_code,
            AttemptStatus::Charged,
            AttemptStatus::Failure,
        ))
    }

    /// Refund against a prior capture; omitting the amount refunds in full.
    pub async fn refund(&self, data: &RefundsData) -> CustomResult<RefundsResult, ConnectorError> {
        let connector_req = BluepayRefundRequest::try_from(self.router_data(data))?;
        let body = RequestContent::form_urlencoded(&connector_req)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let (response, status_code) = self.submit(&self.params.base_url, body).await?;
        Ok(bluepay::refunds_result(response, status_code))
    }

    /// Void of a prior authorization or capture.
    pub async fn void(
        &self,
        data: &PaymentVoidData,
    ) -> CustomResult<PaymentsResult, ConnectorError> {
        let connector_req = BluepayVoidRequest::try_from(self.router_data(data))?;
        let body = RequestContent::form_urlencoded(&connector_req)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let (response, status_code) = self.submit(&self.params.base_url, body).await?;
        Ok(bluepay::payments_result(
            response,
            status_code,
            AttemptStatus::Voided,
            AttemptStatus::VoidFailed,
        ))
    }

    async fn rebill_admin(
        &self,
        verb: AdminVerb,
        rebill_id: &str,
        status: Option<&'static str>,
    ) -> CustomResult<BluepayRebillAdminResponse, ConnectorError> {
        let connector_req = BluepayRebillAdminRequest::try_new(&self.auth, verb, rebill_id, status)?;
        let body = RequestContent::form_urlencoded(&connector_req)
            .change_context(ConnectorError::RequestEncodingFailed)?;
        let (response, _) = self
            .submit::<BluepayRebillAdminResponse>(&self.params.rebill_admin_url, body)
            .await?;
        Ok(response)
    }

    /// Current remote status of a rebill sequence.
    pub async fn rebill_status(
        &self,
        rebill_id: &str,
    ) -> CustomResult<BluepayRebillAdminResponse, ConnectorError> {
        self.rebill_admin(AdminVerb::Get, rebill_id, None).await
    }

    /// Authorization id of the template transaction behind a rebill
    /// sequence; `None` when the gateway does not know the sequence.
    pub async fn authorization_id_by_rebill_id(
        &self,
        rebill_id: &str,
    ) -> CustomResult<Option<String>, ConnectorError> {
        let response = self.rebill_admin(AdminVerb::Get, rebill_id, None).await?;
        Ok(response
            .template_id
            .filter(|template_id| !template_id.is_empty()))
    }

    /// Stop a rebill sequence. Looks the sequence up first and skips the
    /// stop call when it is already stopped or deleted, so at most two
    /// network calls are made and at least one.
    pub async fn cancel_recurring(
        &self,
        rebill_id: &str,
    ) -> CustomResult<RebillCancelResult, ConnectorError> {
        let lookup = self.rebill_admin(AdminVerb::Get, rebill_id, None).await?;
        let status = lookup.rebill_status();
        if status.is_terminal() {
            tracing::info!(rebill_id, ?status, "rebill sequence already terminal");
            return Ok(RebillCancelResult {
                status,
                message: lookup.message,
            });
        }

        let stopped = self
            .rebill_admin(
                AdminVerb::Set,
                rebill_id,
                Some(constants::REBILL_STOP_STATUS),
            )
            .await?;
        Ok(RebillCancelResult {
            status: stopped.rebill_status(),
            message: stopped.message,
        })
    }

    /// Check that an inbound rebill notification carries a genuine stamp.
    pub fn verify_notification(
        &self,
        params: &NotificationParams,
    ) -> CustomResult<bool, ConnectorError> {
        bluepay::verify_rebill_stamp(&self.auth.secret_key, params)
    }
}
