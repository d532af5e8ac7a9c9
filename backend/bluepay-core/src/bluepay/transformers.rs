use std::collections::BTreeMap;

use cards::{CardExpiration, CardNumber};
use common_enums::{AttemptStatus, CaptureMethod, Currency, RefundStatus};
use common_utils::{
    crypto::{self, GenerateDigest},
    date_time,
    masking::{PeekInterface, Secret},
    types::{AmountConvertor, MinorUnit, StringMajorUnit, StringMajorUnitForConnector},
    CustomResult,
};
use error_stack::ResultExt;
use serde::{Deserialize, Serialize};

use crate::{bluepay::constants, errors::ConnectorError};

// ===== AUTHENTICATION =====

/// Gateway credentials, immutable for the lifetime of a client instance.
#[derive(Debug, Clone)]
pub struct BluepayAuthType {
    pub account_id: Secret<String>,
    pub user_id: Secret<String>,
    pub secret_key: Secret<String>,
}

impl BluepayAuthType {
    pub fn new(
        account_id: Secret<String>,
        user_id: Secret<String>,
        secret_key: Secret<String>,
    ) -> Self {
        Self {
            account_id,
            user_id,
            secret_key,
        }
    }
}

/// Sandbox or live processing, selected per request through the MODE field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BluepayMode {
    Test,
    Live,
}

// ===== TRANSACTION TYPES =====

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TransactionType {
    Sale,
    Auth,
    Capture,
    Refund,
    Void,
}

/// Verb of the rebill-administration interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AdminVerb {
    Get,
    Set,
}

// ===== TAMPER-PROOF SEAL =====

fn hex_digest_upper(message: &str) -> CustomResult<String, ConnectorError> {
    let digest = crypto::Md5
        .generate_digest(message.as_bytes())
        .change_context(ConnectorError::RequestEncodingFailed)?;
    Ok(hex::encode_upper(digest))
}

/// Seal for the primary transaction endpoint: digest of secret key, account
/// id, mode, transaction type, amount and master id concatenated with no
/// delimiters. Unset values contribute an empty string. The field subset is
/// declared to the gateway through `TPS_DEF`.
pub fn primary_tamper_proof_seal(
    secret_key: &Secret<String>,
    account_id: &Secret<String>,
    mode: BluepayMode,
    trans_type: TransactionType,
    amount: Option<&StringMajorUnit>,
    master_id: Option<&str>,
) -> CustomResult<Secret<String>, ConnectorError> {
    let message = format!(
        "{}{}{}{}{}{}",
        secret_key.peek(),
        account_id.peek(),
        mode,
        trans_type,
        amount
            .map(StringMajorUnit::get_amount_as_string)
            .unwrap_or_default(),
        master_id.unwrap_or_default(),
    );
    hex_digest_upper(&message).map(Secret::new)
}

/// Seal for the rebill-administration endpoint: secret key, account id,
/// verb and rebill id.
pub fn rebill_admin_seal(
    secret_key: &Secret<String>,
    account_id: &Secret<String>,
    verb: AdminVerb,
    rebill_id: &str,
) -> CustomResult<Secret<String>, ConnectorError> {
    let message = format!(
        "{}{}{}{}",
        secret_key.peek(),
        account_id.peek(),
        verb,
        rebill_id,
    );
    hex_digest_upper(&message).map(Secret::new)
}

/// Recompute the stamp of an inbound rebill notification and compare it with
/// the delivered one. `BP_STAMP_DEF` names the signed fields in order; the
/// comparison is an exact match on the uppercase hex rendering.
pub fn verify_rebill_stamp(
    secret_key: &Secret<String>,
    params: &NotificationParams,
) -> CustomResult<bool, ConnectorError> {
    let stamp_def = params
        .get(constants::BP_STAMP_DEF_FIELD)
        .ok_or(ConnectorError::WebhookSourceVerificationFailed)
        .attach_printable("notification carries no stamp definition")?;
    let delivered = params
        .get(constants::BP_STAMP_FIELD)
        .ok_or(ConnectorError::WebhookSourceVerificationFailed)
        .attach_printable("notification carries no stamp")?;

    let message = stamp_def
        .split(' ')
        .filter(|name| !name.is_empty())
        .fold(secret_key.peek().clone(), |acc, name| {
            acc + params.get(name).unwrap_or_default()
        });

    Ok(hex_digest_upper(&message)? == delivered)
}

// ===== CALLER-FACING REQUEST DATA =====

#[derive(Debug, Clone)]
pub struct CardDetails {
    pub card_number: CardNumber,
    pub expiry: CardExpiration,
    pub cvv2: Secret<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BillingContact {
    pub first_name: Option<Secret<String>>,
    pub last_name: Option<Secret<String>>,
    pub address1: Option<Secret<String>>,
    pub address2: Option<Secret<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<Secret<String>>,
    pub email: Option<Secret<String>>,
    pub phone: Option<Secret<String>>,
}

/// Everything a sale or authorization needs, built fresh per call.
#[derive(Debug, Clone)]
pub struct PaymentsAuthorizeData {
    pub amount: MinorUnit,
    pub currency: Currency,
    pub card: CardDetails,
    pub billing: BillingContact,
    pub capture_method: CaptureMethod,
    pub customer_ip: Option<String>,
    pub custom_id: Option<String>,
    pub custom_id2: Option<String>,
    pub order_id: Option<String>,
    pub invoice_id: Option<String>,
    pub rebill: Option<RebillSchedule>,
}

impl PaymentsAuthorizeData {
    /// Recurring schedules always capture; otherwise the capture method
    /// decides between SALE and AUTH.
    pub fn is_auto_capture(&self) -> bool {
        self.rebill.is_some() || matches!(self.capture_method, CaptureMethod::Automatic)
    }

    pub(crate) fn transaction_type(&self) -> TransactionType {
        if self.is_auto_capture() {
            TransactionType::Sale
        } else {
            TransactionType::Auth
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub master_id: String,
    pub amount: MinorUnit,
    pub currency: Currency,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub master_id: String,
    /// `None` refunds the full remaining amount; the AMOUNT field is then
    /// omitted from the request entirely.
    pub amount: Option<MinorUnit>,
    pub currency: Currency,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub master_id: String,
}

// ===== RECURRING SCHEDULE =====

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RebillPeriod {
    Day,
    Week,
    Month,
    Year,
}

/// A recurrence step such as "1 MONTH" or "14 DAY".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RebillExpression {
    pub length: u16,
    pub period: RebillPeriod,
}

impl std::fmt::Display for RebillExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.length, self.period)
    }
}

/// First occurrence of a rebill: a concrete date, or relative to the
/// initial charge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RebillFirstDate {
    On(time::Date),
    After(RebillExpression),
}

impl RebillFirstDate {
    fn to_wire(self) -> CustomResult<String, ConnectorError> {
        match self {
            Self::On(date) => date_time::date_as_yyyymmdd_hyphenated(date)
                .change_context(ConnectorError::RequestEncodingFailed),
            Self::After(expression) => Ok(expression.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RebillSchedule {
    pub first_date: RebillFirstDate,
    pub expression: RebillExpression,
    /// Number of rebills after the initial charge; `None` runs until
    /// stopped.
    pub cycles: Option<u16>,
    pub amount: MinorUnit,
}

// ===== WIRE REQUESTS =====

/// Wrapper pairing caller data with the credentials and mode of the client
/// issuing the call.
pub struct BluepayRouterData<'a, T> {
    pub auth: &'a BluepayAuthType,
    pub mode: BluepayMode,
    pub request: T,
}

/// Fields appended to every primary-endpoint request, including the seal
/// computed over the values gathered *before* this struct is attached.
#[derive(Debug, Serialize)]
pub struct BluepayCommonFields {
    #[serde(rename = "ACCOUNT_ID")]
    account_id: Secret<String>,
    #[serde(rename = "USER_ID")]
    user_id: Secret<String>,
    #[serde(rename = "MODE")]
    mode: BluepayMode,
    #[serde(rename = "TRANS_TYPE")]
    trans_type: TransactionType,
    #[serde(rename = "VERSION")]
    version: &'static str,
    #[serde(rename = "TPS_DEF")]
    tps_def: &'static str,
    #[serde(rename = "TAMPER_PROOF_SEAL")]
    tamper_proof_seal: Secret<String>,
}

impl BluepayCommonFields {
    fn try_new(
        auth: &BluepayAuthType,
        mode: BluepayMode,
        trans_type: TransactionType,
        amount: Option<&StringMajorUnit>,
        master_id: Option<&str>,
    ) -> CustomResult<Self, ConnectorError> {
        let tamper_proof_seal = primary_tamper_proof_seal(
            &auth.secret_key,
            &auth.account_id,
            mode,
            trans_type,
            amount,
            master_id,
        )?;
        Ok(Self {
            account_id: auth.account_id.clone(),
            user_id: auth.user_id.clone(),
            mode,
            trans_type,
            version: constants::PROTOCOL_VERSION,
            tps_def: constants::TPS_DEF,
            tamper_proof_seal,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BluepayRebillFields {
    #[serde(rename = "DO_REBILL")]
    do_rebill: &'static str,
    #[serde(rename = "REB_FIRST_DATE")]
    reb_first_date: String,
    #[serde(rename = "REB_EXPR")]
    reb_expr: String,
    #[serde(rename = "REB_CYCLES", skip_serializing_if = "Option::is_none")]
    reb_cycles: Option<u16>,
    #[serde(rename = "REB_AMOUNT")]
    reb_amount: StringMajorUnit,
}

impl TryFrom<(&RebillSchedule, Currency)> for BluepayRebillFields {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from((schedule, currency): (&RebillSchedule, Currency)) -> Result<Self, Self::Error> {
        let reb_amount = StringMajorUnitForConnector
            .convert(schedule.amount, currency)
            .change_context(ConnectorError::AmountConversionFailed)?;
        Ok(Self {
            do_rebill: constants::DO_REBILL,
            reb_first_date: schedule.first_date.to_wire()?,
            reb_expr: schedule.expression.to_string(),
            reb_cycles: schedule.cycles,
            reb_amount,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BluepayPaymentsRequest {
    #[serde(rename = "PAYMENT_TYPE")]
    payment_type: &'static str,
    #[serde(rename = "AMOUNT")]
    amount: StringMajorUnit,
    #[serde(rename = "PAYMENT_ACCOUNT")]
    payment_account: CardNumber,
    #[serde(rename = "CARD_EXPIRE")]
    card_expire: Secret<String>,
    #[serde(rename = "CARD_CVV2")]
    card_cvv2: Secret<String>,
    #[serde(rename = "NAME1", skip_serializing_if = "Option::is_none")]
    first_name: Option<Secret<String>>,
    #[serde(rename = "NAME2", skip_serializing_if = "Option::is_none")]
    last_name: Option<Secret<String>>,
    #[serde(rename = "ADDR1", skip_serializing_if = "Option::is_none")]
    address1: Option<Secret<String>>,
    #[serde(rename = "ADDR2", skip_serializing_if = "Option::is_none")]
    address2: Option<Secret<String>>,
    #[serde(rename = "CITY", skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(rename = "STATE", skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(rename = "COUNTRY", skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(rename = "ZIP", skip_serializing_if = "Option::is_none")]
    zip: Option<Secret<String>>,
    #[serde(rename = "EMAIL", skip_serializing_if = "Option::is_none")]
    email: Option<Secret<String>>,
    #[serde(rename = "PHONE", skip_serializing_if = "Option::is_none")]
    phone: Option<Secret<String>>,
    #[serde(rename = "CUSTOM_ID", skip_serializing_if = "Option::is_none")]
    custom_id: Option<String>,
    #[serde(rename = "CUSTOM_ID2", skip_serializing_if = "Option::is_none")]
    custom_id2: Option<String>,
    #[serde(rename = "CUSTOMER_IP", skip_serializing_if = "Option::is_none")]
    customer_ip: Option<String>,
    #[serde(rename = "ORDER_ID", skip_serializing_if = "Option::is_none")]
    order_id: Option<String>,
    #[serde(rename = "INVOICE_ID", skip_serializing_if = "Option::is_none")]
    invoice_id: Option<String>,
    #[serde(flatten)]
    rebill: Option<BluepayRebillFields>,
    #[serde(flatten)]
    common: BluepayCommonFields,
}

impl TryFrom<BluepayRouterData<'_, &PaymentsAuthorizeData>> for BluepayPaymentsRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: BluepayRouterData<'_, &PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        let data = item.request;
        let amount = StringMajorUnitForConnector
            .convert(data.amount, data.currency)
            .change_context(ConnectorError::AmountConversionFailed)?;
        let rebill = data
            .rebill
            .as_ref()
            .map(|schedule| BluepayRebillFields::try_from((schedule, data.currency)))
            .transpose()?;
        let common = BluepayCommonFields::try_new(
            item.auth,
            item.mode,
            data.transaction_type(),
            Some(&amount),
            None,
        )?;

        Ok(Self {
            payment_type: constants::PAYMENT_TYPE_CREDIT,
            amount,
            payment_account: data.card.card_number.clone(),
            card_expire: data.card.expiry.format_mmyy(),
            card_cvv2: data.card.cvv2.clone(),
            first_name: data.billing.first_name.clone(),
            last_name: data.billing.last_name.clone(),
            address1: data.billing.address1.clone(),
            address2: data.billing.address2.clone(),
            city: data.billing.city.clone(),
            state: data.billing.state.clone(),
            country: data.billing.country.clone(),
            zip: data.billing.zip.clone(),
            email: data.billing.email.clone(),
            phone: data.billing.phone.clone(),
            custom_id: data.custom_id.clone(),
            custom_id2: data.custom_id2.clone(),
            customer_ip: data.customer_ip.clone(),
            order_id: data.order_id.clone(),
            invoice_id: data.invoice_id.clone(),
            rebill,
            common,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BluepayCaptureRequest {
    #[serde(rename = "MASTER_ID")]
    master_id: String,
    #[serde(rename = "AMOUNT")]
    amount: StringMajorUnit,
    #[serde(flatten)]
    common: BluepayCommonFields,
}

impl TryFrom<BluepayRouterData<'_, &PaymentsCaptureData>> for BluepayCaptureRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: BluepayRouterData<'_, &PaymentsCaptureData>) -> Result<Self, Self::Error> {
        let data = item.request;
        let amount = StringMajorUnitForConnector
            .convert(data.amount, data.currency)
            .change_context(ConnectorError::AmountConversionFailed)?;
        let common = BluepayCommonFields::try_new(
            item.auth,
            item.mode,
            TransactionType::Capture,
            Some(&amount),
            Some(&data.master_id),
        )?;
        Ok(Self {
            master_id: data.master_id.clone(),
            amount,
            common,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BluepayRefundRequest {
    #[serde(rename = "MASTER_ID")]
    master_id: String,
    #[serde(rename = "AMOUNT", skip_serializing_if = "Option::is_none")]
    amount: Option<StringMajorUnit>,
    #[serde(flatten)]
    common: BluepayCommonFields,
}

impl TryFrom<BluepayRouterData<'_, &RefundsData>> for BluepayRefundRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: BluepayRouterData<'_, &RefundsData>) -> Result<Self, Self::Error> {
        let data = item.request;
        let amount = data
            .amount
            .map(|amount| {
                StringMajorUnitForConnector
                    .convert(amount, data.currency)
                    .change_context(ConnectorError::AmountConversionFailed)
            })
            .transpose()?;
        let common = BluepayCommonFields::try_new(
            item.auth,
            item.mode,
            TransactionType::Refund,
            amount.as_ref(),
            Some(&data.master_id),
        )?;
        Ok(Self {
            master_id: data.master_id.clone(),
            amount,
            common,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BluepayVoidRequest {
    #[serde(rename = "MASTER_ID")]
    master_id: String,
    #[serde(flatten)]
    common: BluepayCommonFields,
}

impl TryFrom<BluepayRouterData<'_, &PaymentVoidData>> for BluepayVoidRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(item: BluepayRouterData<'_, &PaymentVoidData>) -> Result<Self, Self::Error> {
        let data = item.request;
        let common = BluepayCommonFields::try_new(
            item.auth,
            item.mode,
            TransactionType::Void,
            None,
            Some(&data.master_id),
        )?;
        Ok(Self {
            master_id: data.master_id.clone(),
            common,
        })
    }
}

/// Request to the rebill-administration endpoint. Carries its own seal
/// scheme, separate from the primary one.
#[derive(Debug, Serialize)]
pub struct BluepayRebillAdminRequest {
    #[serde(rename = "ACCOUNT_ID")]
    account_id: Secret<String>,
    #[serde(rename = "USER_ID")]
    user_id: Secret<String>,
    #[serde(rename = "TRANS_TYPE")]
    trans_type: AdminVerb,
    #[serde(rename = "REBILL_ID")]
    rebill_id: String,
    #[serde(rename = "STATUS", skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(rename = "TAMPER_PROOF_SEAL")]
    tamper_proof_seal: Secret<String>,
}

impl BluepayRebillAdminRequest {
    pub(crate) fn try_new(
        auth: &BluepayAuthType,
        verb: AdminVerb,
        rebill_id: &str,
        status: Option<&'static str>,
    ) -> CustomResult<Self, ConnectorError> {
        let tamper_proof_seal =
            rebill_admin_seal(&auth.secret_key, &auth.account_id, verb, rebill_id)?;
        Ok(Self {
            account_id: auth.account_id.clone(),
            user_id: auth.user_id.clone(),
            trans_type: verb,
            rebill_id: rebill_id.to_string(),
            status,
            tamper_proof_seal,
        })
    }
}

// ===== WIRE RESPONSES =====

/// Interpretation of a primary-path response, settled once at parse time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransactionOutcome {
    Approved,
    Declined,
    /// Approved status paired with the duplicate-submission sentinel; the
    /// gateway did not run a new transaction.
    DuplicateSuppressed,
    Error,
}

impl TransactionOutcome {
    pub fn is_successful(self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BluepayPaymentsResponse {
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    #[serde(rename = "MESSAGE")]
    pub message: Option<String>,
    #[serde(rename = "TRANS_ID")]
    pub trans_id: Option<String>,
    #[serde(rename = "AVS")]
    pub avs: Option<String>,
    #[serde(rename = "CVV2")]
    pub cvv2: Option<String>,
    #[serde(rename = "REBID")]
    pub rebill_id: Option<String>,
    #[serde(rename = "AUTH_CODE")]
    pub auth_code: Option<String>,
    #[serde(rename = "PAYMENT_ACCOUNT_MASK")]
    pub card_mask: Option<String>,
    #[serde(rename = "CARD_TYPE")]
    pub card_type: Option<String>,
    #[serde(rename = "CARD_COUNTRY")]
    pub card_country: Option<String>,
    #[serde(rename = "BIN")]
    pub bank_id: Option<String>,
    #[serde(rename = "BANK_NAME")]
    pub bank_name: Option<String>,
    #[serde(rename = "BINDATA")]
    pub bank_network_data: Option<String>,
}

impl BluepayPaymentsResponse {
    pub fn outcome(&self) -> TransactionOutcome {
        match self.status.as_deref() {
            Some(constants::STATUS_APPROVED) => {
                if self.message.as_deref() == Some(constants::DUPLICATE_MESSAGE) {
                    TransactionOutcome::DuplicateSuppressed
                } else {
                    TransactionOutcome::Approved
                }
            }
            Some(constants::STATUS_DECLINED) => TransactionOutcome::Declined,
            _ => TransactionOutcome::Error,
        }
    }
}

/// Responses whose diagnostic message the transport may need to backfill
/// when an HTTP error body carries none.
pub(crate) trait FormResponse: serde::de::DeserializeOwned {
    fn message_mut(&mut self) -> &mut Option<String>;
}

impl FormResponse for BluepayPaymentsResponse {
    fn message_mut(&mut self) -> &mut Option<String> {
        &mut self.message
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BluepayRebillAdminResponse {
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    #[serde(rename = "MESSAGE")]
    pub message: Option<String>,
    #[serde(rename = "REBILL_ID")]
    pub rebill_id: Option<String>,
    #[serde(rename = "TEMPLATE_ID")]
    pub template_id: Option<String>,
}

impl BluepayRebillAdminResponse {
    pub fn rebill_status(&self) -> RebillStatus {
        self.status
            .as_deref()
            .map(RebillStatus::from_token)
            .unwrap_or(RebillStatus::Unrecognized)
    }
}

impl FormResponse for BluepayRebillAdminResponse {
    fn message_mut(&mut self) -> &mut Option<String> {
        &mut self.message
    }
}

// ===== REBILL STATUS =====

/// Status tokens the gateway uses for a rebill sequence, in admin responses
/// and in notifications alike.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RebillStatus {
    Active,
    Expired,
    Failed,
    Error,
    Deleted,
    Stopped,
    Unrecognized,
}

impl RebillStatus {
    pub fn from_token(token: &str) -> Self {
        match token {
            "active" => Self::Active,
            "expired" => Self::Expired,
            "failed" => Self::Failed,
            "error" => Self::Error,
            "deleted" => Self::Deleted,
            "stopped" => Self::Stopped,
            _ => Self::Unrecognized,
        }
    }

    /// A terminal sequence cannot be stopped again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Deleted | Self::Stopped)
    }
}

// ===== CALLER-FACING RESULTS =====

/// Typed result of a sale, capture or void call.
#[derive(Clone, Debug)]
pub struct PaymentsResult {
    pub outcome: TransactionOutcome,
    pub status: AttemptStatus,
    pub transaction_id: Option<String>,
    pub message: String,
    pub auth_code: Option<String>,
    pub avs_code: Option<String>,
    pub cvv2_code: Option<String>,
    pub rebill_id: Option<String>,
    pub card_mask: Option<String>,
    pub card_type: Option<String>,
    pub card_country: Option<String>,
    pub bank_id: Option<String>,
    pub bank_name: Option<String>,
    pub bank_network_data: Option<String>,
    pub status_code: u16,
}

impl PaymentsResult {
    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }
}

/// Typed result of a refund call.
#[derive(Clone, Debug)]
pub struct RefundsResult {
    pub outcome: TransactionOutcome,
    pub refund_status: RefundStatus,
    pub transaction_id: Option<String>,
    pub message: String,
    pub status_code: u16,
}

impl RefundsResult {
    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }
}

/// Result of a recurring cancellation: the remote status after the call,
/// which is also the success predicate (stopped or deleted).
#[derive(Clone, Debug)]
pub struct RebillCancelResult {
    pub status: RebillStatus,
    pub message: Option<String>,
}

impl RebillCancelResult {
    pub fn is_successful(&self) -> bool {
        self.status.is_terminal()
    }
}

pub(crate) fn payments_result(
    response: BluepayPaymentsResponse,
    status_code: u16,
    success_status: AttemptStatus,
    failure_status: AttemptStatus,
) -> PaymentsResult {
    let outcome = response.outcome();
    let status = if outcome.is_successful() {
        success_status
    } else {
        failure_status
    };
    PaymentsResult {
        outcome,
        status,
        transaction_id: response.trans_id,
        message: response.message.unwrap_or_default(),
        auth_code: response.auth_code,
        avs_code: response.avs,
        cvv2_code: response.cvv2,
        rebill_id: response.rebill_id,
        card_mask: response.card_mask,
        card_type: response.card_type,
        card_country: response.card_country,
        bank_id: response.bank_id,
        bank_name: response.bank_name,
        bank_network_data: response.bank_network_data,
        status_code,
    }
}

pub(crate) fn refunds_result(response: BluepayPaymentsResponse, status_code: u16) -> RefundsResult {
    let outcome = response.outcome();
    let refund_status = if outcome.is_successful() {
        RefundStatus::Success
    } else {
        RefundStatus::Failure
    };
    RefundsResult {
        outcome,
        refund_status,
        transaction_id: response.trans_id,
        message: response.message.unwrap_or_default(),
        status_code,
    }
}

// ===== NOTIFICATION PARAMETERS =====

/// The flat field set of an inbound gateway notification, as posted to the
/// public callback endpoint.
#[derive(Clone, Debug, Default)]
pub struct NotificationParams(BTreeMap<String, String>);

impl NotificationParams {
    /// Decode from the raw `application/x-www-form-urlencoded` POST body.
    pub fn from_urlencoded(body: &[u8]) -> CustomResult<Self, ConnectorError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .change_context(ConnectorError::WebhookBodyDecodingFailed)?;
        Ok(Self(pairs.into_iter().collect()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn rebill_id(&self) -> Option<&str> {
        self.get(constants::NOTIFICATION_REBILL_ID_FIELD)
    }

    pub fn status(&self) -> RebillStatus {
        self.get(constants::NOTIFICATION_STATUS_FIELD)
            .map(RebillStatus::from_token)
            .unwrap_or(RebillStatus::Unrecognized)
    }
}

impl FromIterator<(String, String)> for NotificationParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
