use serde::{Deserialize, Serialize};

/// The status of a payment attempt as tracked locally after a gateway call.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttemptStatus {
    Authorized,
    Charged,
    Failure,
    Voided,
    VoidFailed,
    #[default]
    Pending,
}

/// The status of a refund as tracked locally after a gateway call.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RefundStatus {
    Success,
    Failure,
    #[default]
    Pending,
}

/// Whether an authorization should be captured in the same call or later
/// through an explicit capture.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureMethod {
    #[default]
    Automatic,
    Manual,
}

/// ISO 4217 currency codes accepted by the client API.
///
/// The set is restricted to currencies the gateway settles; the decimal
/// classification below drives minor-to-major amount conversion.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Currency {
    AED,
    AUD,
    BHD,
    BIF,
    BRL,
    CAD,
    CHF,
    CLP,
    CNY,
    CZK,
    DJF,
    DKK,
    EUR,
    GBP,
    GNF,
    HKD,
    HUF,
    IDR,
    ILS,
    INR,
    IQD,
    JOD,
    JPY,
    KMF,
    KRW,
    KWD,
    LYD,
    MGA,
    MXN,
    MYR,
    NOK,
    NZD,
    OMR,
    PHP,
    PLN,
    PYG,
    RWF,
    SAR,
    SEK,
    SGD,
    THB,
    TND,
    TRY,
    TWD,
    UGX,
    #[default]
    USD,
    VND,
    VUV,
    XAF,
    XOF,
    XPF,
    ZAR,
}

impl Currency {
    /// Currencies with no minor unit (amounts are whole major units).
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BIF
                | Self::CLP
                | Self::DJF
                | Self::GNF
                | Self::JPY
                | Self::KMF
                | Self::KRW
                | Self::MGA
                | Self::PYG
                | Self::RWF
                | Self::UGX
                | Self::VND
                | Self::VUV
                | Self::XAF
                | Self::XOF
                | Self::XPF
        )
    }

    /// Currencies with three-decimal minor units.
    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::IQD | Self::JOD | Self::KWD | Self::LYD | Self::OMR | Self::TND
        )
    }
}
