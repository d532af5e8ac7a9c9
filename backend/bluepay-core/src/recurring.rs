//! Recurring-billing notification handling
//!
//! The gateway posts a form-encoded notification to a public callback after
//! every rebill cycle. This module verifies the stamp, resolves the local
//! recurring schedule through the host's hook, and hands the hook an
//! explicit cycle outcome. Misses at any step are logged benign no-ops,
//! which also makes duplicate delivery safe.

use async_trait::async_trait;
use common_utils::{masking::Secret, CustomResult};

use crate::{
    bluepay::{
        transformers::{verify_rebill_stamp, NotificationParams, RebillStatus},
        Bluepay,
    },
    errors::ConnectorError,
};

/// Effect of one notification on the local schedule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RebillCycleOutcome {
    /// The cycle was charged; advance the schedule by one cycle.
    Advance,
    /// The charge failed; record the failure without advancing, the gateway
    /// retries on its own.
    MarkFailed,
    /// The sequence ended remotely; terminate the schedule.
    Terminate,
}

/// Terminal disposition of one processed notification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RebillNotificationOutcome {
    /// Stamp verification failed; the notification was discarded unacted.
    Rejected,
    /// The gateway does not know the rebill id, or it maps to no
    /// authorization.
    UnknownRebill,
    /// No local schedule records the originating authorization.
    NoLocalSchedule,
    /// The status token is not one this integration reacts to.
    Ignored,
    Applied(RebillCycleOutcome),
}

/// Opaque handle to a host-side recurring schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecurringScheduleRef(pub String);

/// Rebill-id to authorization-id resolution, performed against the gateway's
/// admin endpoint in production.
#[async_trait]
pub trait RebillLookup: Send + Sync {
    async fn authorization_id_by_rebill_id(
        &self,
        rebill_id: &str,
    ) -> CustomResult<Option<String>, ConnectorError>;
}

#[async_trait]
impl RebillLookup for Bluepay {
    async fn authorization_id_by_rebill_id(
        &self,
        rebill_id: &str,
    ) -> CustomResult<Option<String>, ConnectorError> {
        Self::authorization_id_by_rebill_id(self, rebill_id).await
    }
}

/// The host commerce layer's side of the boundary: resolve the schedule that
/// recorded an authorization, and apply a cycle outcome to it.
#[async_trait]
pub trait RecurringScheduleHook: Send + Sync {
    async fn find_schedule(
        &self,
        authorization_id: &str,
    ) -> CustomResult<Option<RecurringScheduleRef>, ConnectorError>;

    async fn apply_cycle_outcome(
        &self,
        schedule: &RecurringScheduleRef,
        outcome: RebillCycleOutcome,
    ) -> CustomResult<(), ConnectorError>;
}

fn cycle_outcome_for(status: RebillStatus) -> Option<RebillCycleOutcome> {
    match status {
        RebillStatus::Active | RebillStatus::Expired => Some(RebillCycleOutcome::Advance),
        RebillStatus::Failed | RebillStatus::Error => Some(RebillCycleOutcome::MarkFailed),
        RebillStatus::Deleted | RebillStatus::Stopped => Some(RebillCycleOutcome::Terminate),
        RebillStatus::Unrecognized => None,
    }
}

/// Process one inbound rebill notification end to end.
pub async fn process_rebill_notification(
    secret_key: &Secret<String>,
    lookup: &dyn RebillLookup,
    hook: &dyn RecurringScheduleHook,
    params: &NotificationParams,
) -> CustomResult<RebillNotificationOutcome, ConnectorError> {
    match verify_rebill_stamp(secret_key, params) {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!("rebill notification stamp mismatch, discarding");
            return Ok(RebillNotificationOutcome::Rejected);
        }
        Err(error) => {
            tracing::error!(?error, "rebill notification stamp missing, discarding");
            return Ok(RebillNotificationOutcome::Rejected);
        }
    }

    let Some(rebill_id) = params.rebill_id() else {
        tracing::warn!("rebill notification carries no rebill id");
        return Ok(RebillNotificationOutcome::UnknownRebill);
    };

    let Some(authorization_id) = lookup.authorization_id_by_rebill_id(rebill_id).await? else {
        tracing::error!(rebill_id, "no template authorization found for rebill");
        return Ok(RebillNotificationOutcome::UnknownRebill);
    };

    let Some(schedule) = hook.find_schedule(&authorization_id).await? else {
        tracing::warn!(
            rebill_id,
            authorization_id,
            "no local schedule records this authorization"
        );
        return Ok(RebillNotificationOutcome::NoLocalSchedule);
    };

    let status = params.status();
    let Some(outcome) = cycle_outcome_for(status) else {
        tracing::info!(rebill_id, ?status, "ignoring unrecognized rebill status");
        return Ok(RebillNotificationOutcome::Ignored);
    };

    hook.apply_cycle_outcome(&schedule, outcome).await?;
    tracing::info!(rebill_id, ?outcome, "rebill notification applied");
    Ok(RebillNotificationOutcome::Applied(outcome))
}
