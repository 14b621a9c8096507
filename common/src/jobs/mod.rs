//! Client-side view of a submitted send job.
//!
//! At most one job is tracked per session. Its status only ever moves
//! forward through `submitted -> running -> {completed | failed}`, driven by
//! status reports fetched from the backend; the client never advances a job
//! on its own clock.

use serde::{Deserialize, Serialize};

/// Coarse lifecycle stage of the tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Submitted,
    Running,
    Completed,
    Failed,
}

impl CampaignStatus {
    /// Completed and failed jobs never leave their state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    /// Maps a backend status string onto the client lifecycle. Returns
    /// `None` for stages the client does not distinguish, which the caller
    /// treats as "no transition".
    pub fn from_report(status: &str) -> Option<Self> {
        match status.to_ascii_lowercase().as_str() {
            "submitted" | "queued" | "pending" | "scheduled" => Some(CampaignStatus::Submitted),
            "running" | "in_progress" | "processing" | "sending" => Some(CampaignStatus::Running),
            "completed" | "complete" | "done" => Some(CampaignStatus::Completed),
            "failed" | "error" | "cancelled" => Some(CampaignStatus::Failed),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CampaignStatus::Submitted => 0,
            CampaignStatus::Running => 1,
            CampaignStatus::Completed | CampaignStatus::Failed => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Submitted => "submitted",
            CampaignStatus::Running => "running",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
        }
    }
}

/// The one send job this session is observing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignJob {
    /// Backend-assigned identifier; opaque to the client.
    pub id: String,
    /// Wall-clock submission time in milliseconds since the epoch.
    pub submitted_at_ms: f64,
    pub status: CampaignStatus,
}

impl CampaignJob {
    pub fn new(id: String, submitted_at_ms: f64) -> Self {
        Self {
            id,
            submitted_at_ms,
            status: CampaignStatus::Submitted,
        }
    }

    /// Applies a reported status, keeping transitions monotonic: terminal
    /// states absorb, and a report never moves the job backwards. Returns
    /// whether the status changed.
    pub fn advance(&mut self, next: CampaignStatus) -> bool {
        if self.status.is_terminal() || next.rank() <= self.status.rank() {
            return false;
        }
        self.status = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_strings_map_to_lifecycle_stages() {
        assert_eq!(
            CampaignStatus::from_report("QUEUED"),
            Some(CampaignStatus::Submitted)
        );
        assert_eq!(
            CampaignStatus::from_report("in_progress"),
            Some(CampaignStatus::Running)
        );
        assert_eq!(
            CampaignStatus::from_report("done"),
            Some(CampaignStatus::Completed)
        );
        assert_eq!(
            CampaignStatus::from_report("error"),
            Some(CampaignStatus::Failed)
        );
        assert_eq!(CampaignStatus::from_report("paused"), None);
    }

    #[test]
    fn status_only_moves_forward() {
        let mut job = CampaignJob::new("j1".into(), 0.0);
        assert!(job.advance(CampaignStatus::Running));
        assert!(!job.advance(CampaignStatus::Submitted));
        assert_eq!(job.status, CampaignStatus::Running);
        assert!(job.advance(CampaignStatus::Completed));
        assert!(job.status.is_terminal());
    }

    #[test]
    fn terminal_states_absorb_later_reports() {
        let mut job = CampaignJob::new("j1".into(), 0.0);
        assert!(job.advance(CampaignStatus::Failed));
        assert!(!job.advance(CampaignStatus::Running));
        assert!(!job.advance(CampaignStatus::Completed));
        assert_eq!(job.status, CampaignStatus::Failed);
    }

    #[test]
    fn submitted_can_jump_straight_to_terminal() {
        let mut job = CampaignJob::new("j1".into(), 0.0);
        assert!(job.advance(CampaignStatus::Completed));
        assert_eq!(job.status, CampaignStatus::Completed);
    }

    #[test]
    fn repeated_report_is_not_a_change() {
        let mut job = CampaignJob::new("j1".into(), 0.0);
        assert!(job.advance(CampaignStatus::Running));
        assert!(!job.advance(CampaignStatus::Running));
    }
}
