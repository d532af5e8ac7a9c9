//! Client-side integration with the BluePay 2.0 card-processing gateway.
//!
//! The crate builds signed, form-encoded requests for payment operations
//! (sale, authorize, capture, refund, void, recurring billing and recurring
//! cancellation), posts them over TLS, and interprets the gateway's
//! form-encoded response into typed results. It also verifies and applies
//! the asynchronous rebill notifications the gateway posts back after each
//! recurring cycle.
//!
//! The host commerce application supplies operation parameters and consumes
//! typed results through [`Bluepay`]; its order and schedule stores plug in
//! through the traits in [`recurring`].

pub mod bluepay;
pub mod configs;
pub mod errors;
pub mod recurring;
pub mod service;
pub mod types;

pub use bluepay::{
    transformers::{
        BillingContact, BluepayAuthType, BluepayMode, CardDetails, NotificationParams,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResult,
        RebillCancelResult, RebillExpression, RebillFirstDate, RebillPeriod, RebillSchedule,
        RebillStatus, RefundsData, RefundsResult, TransactionOutcome,
    },
    Bluepay,
};
pub use recurring::{
    process_rebill_notification, RebillCycleOutcome, RebillLookup, RebillNotificationOutcome,
    RecurringScheduleHook, RecurringScheduleRef,
};
