//! Wire shapes for the two analytics channels: the polled hourly report and
//! the websocket event stream. Reconciling them into one displayed view is
//! the frontend's job; these types only pin down the payloads.

use serde::{Deserialize, Serialize};

/// Campaign-wide delivery counters.
///
/// A snapshot is always treated as a complete statement of the current
/// totals. It is replaced as a unit, never patched field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub pending: u64,
    pub delivered: u64,
    pub failed: u64,
}

/// Delivery outcome attached to a single activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Delivered,
    Failed,
    Pending,
}

impl ActivityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityStatus::Delivered => "delivered",
            ActivityStatus::Failed => "failed",
            ActivityStatus::Pending => "pending",
        }
    }
}

/// One per-recipient event from the push stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub time: String,
    pub email: String,
    pub status: ActivityStatus,
    #[serde(default)]
    pub details: String,
}

/// One reporting-period aggregate from `GET /analytics/hourly`.
///
/// Buckets are contributions for their period, not running totals; summing a
/// single report's buckets gives the totals for that report's window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub sent: u64,
    pub delivered: u64,
    pub failed: u64,
}

/// A message from the push socket, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PushMessage {
    /// Full replacement of the displayed counters.
    Metrics { metrics: MetricsSnapshot },
    /// Incremental append to the activity log.
    Activity { activity: ActivityEntry },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_message_decodes_from_tagged_json() {
        let raw = r#"{"type":"metrics","metrics":{"total":12,"pending":4,"delivered":7,"failed":1}}"#;
        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(
            msg,
            PushMessage::Metrics {
                metrics: MetricsSnapshot {
                    total: 12,
                    pending: 4,
                    delivered: 7,
                    failed: 1,
                },
            }
        );
    }

    #[test]
    fn activity_message_decodes_from_tagged_json() {
        let raw = r#"{"type":"activity","activity":{"time":"10:02:11","email":"a@x.com","status":"failed","details":"bounced"}}"#;
        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        match msg {
            PushMessage::Activity { activity } => {
                assert_eq!(activity.email, "a@x.com");
                assert_eq!(activity.status, ActivityStatus::Failed);
                assert_eq!(activity.details, "bounced");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn activity_details_default_to_empty() {
        let raw = r#"{"type":"activity","activity":{"time":"now","email":"b@x.com","status":"pending"}}"#;
        let msg: PushMessage = serde_json::from_str(raw).unwrap();
        match msg {
            PushMessage::Activity { activity } => assert_eq!(activity.details, ""),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let raw = r#"{"type":"heartbeat"}"#;
        assert!(serde_json::from_str::<PushMessage>(raw).is_err());
    }
}
