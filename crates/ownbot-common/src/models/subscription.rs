//! Subscription models — plan, lifecycle state, and the sweep report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A client's billing subscription.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub client_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Set once, when the expiry warning is issued
    pub warned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    Trial,
    Starter,
    Pro,
}

impl Plan {
    /// Default term length in days when a request does not specify one.
    pub fn default_term_days(self) -> i64 {
        match self {
            Plan::Trial => 14,
            Plan::Starter => 30,
            Plan::Pro => 365,
        }
    }
}

/// Lifecycle: active → warned → expired, or active → cancelled.
/// `warned` still serves traffic; `expired` and `cancelled` do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Warned,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    /// Whether a subscription in this state entitles the client to serve chat.
    pub fn is_serving(self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Warned)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    pub client_id: Uuid,

    pub plan: Plan,

    /// Term length in days; defaults per plan when omitted.
    #[validate(range(min = 1, max = 3650, message = "Term must be 1-3650 days"))]
    pub term_days: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenewSubscriptionRequest {
    /// Days added to the current expiry (or to now, if already past).
    #[validate(range(min = 1, max = 3650, message = "Extension must be 1-3650 days"))]
    pub extend_days: i64,
}

/// Outcome of the subscription sweep, relayed by the admin endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionCheckReport {
    /// Active subscriptions past their expiry that were marked expired.
    pub expired_count: u64,
    /// Active subscriptions inside the warning window that were marked warned.
    pub warned_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serving_states() {
        assert!(SubscriptionStatus::Active.is_serving());
        assert!(SubscriptionStatus::Warned.is_serving());
        assert!(!SubscriptionStatus::Expired.is_serving());
        assert!(!SubscriptionStatus::Cancelled.is_serving());
    }

    #[test]
    fn report_defaults_to_zero_counts() {
        let report = SubscriptionCheckReport::default();
        assert_eq!(report.expired_count, 0);
        assert_eq!(report.warned_count, 0);
    }

    #[test]
    fn plan_terms_are_positive() {
        for plan in [Plan::Trial, Plan::Starter, Plan::Pro] {
            assert!(plan.default_term_days() > 0);
        }
    }
}
