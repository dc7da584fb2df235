use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Subscription plans the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Yearly => "yearly",
        }
    }

    /// Label shown next to the plan selector
    pub fn label(&self) -> &'static str {
        match self {
            Plan::Monthly => "Monthly Plan (30 days)",
            Plan::Yearly => "Yearly Plan (365 days)",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Plan::Monthly => Plan::Yearly,
            Plan::Yearly => Plan::Monthly,
        }
    }
}

/// Server-computed subscription state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
    // naive UTC timestamp, the backend serializes without an offset
    #[serde(default)]
    pub subscription_end_date: Option<NaiveDateTime>,
    pub status: SubscriptionState,
}

impl SubscriptionStatus {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionState::Active
    }

    /// End date formatted for display, or "-" when none is set
    pub fn end_date_display(&self) -> String {
        self.subscription_end_date
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Response of the subscribe (simulated payment) operation.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeReceipt {
    pub message: String,
    #[serde(default)]
    pub subscription_end_date: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_active_with_naive_end_date() {
        let json = r#"{
            "is_subscribed": true,
            "subscription_end_date": "2026-09-05T16:02:11.503821",
            "status": "active"
        }"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_active());
        assert_eq!(status.end_date_display(), "Sep 05, 2026");
    }

    #[test]
    fn status_parses_expired_without_end_date() {
        let json = r#"{"is_subscribed": false, "subscription_end_date": null, "status": "expired"}"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();
        assert!(!status.is_active());
        assert_eq!(status.end_date_display(), "-");
    }

    #[test]
    fn plan_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Plan::Monthly).unwrap(), "monthly");
        assert_eq!(Plan::Yearly.as_str(), "yearly");
        assert_eq!(Plan::Monthly.toggle(), Plan::Yearly);
    }
}
