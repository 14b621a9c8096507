//! Reconciliation of the two analytics channels into one displayed view.
//!
//! The polled hourly report and the push stream share no sequence numbers
//! and no clock, so no true ordering between them exists. The policy is
//! "last received wins": whichever channel most recently produced an update
//! owns the displayed counters. Each update is a full replacement, which
//! keeps the view self-consistent and immune to double counting when the
//! report's window slides between polls. Activity events are the one
//! incremental input and only ever append to a bounded log.

use std::collections::VecDeque;

use common::model::analytics::{ActivityEntry, HourlyBucket, MetricsSnapshot, PushMessage};

/// Number of recent activity entries kept for display.
pub const ACTIVITY_CAPACITY: usize = 10;

/// Which channel produced the counters currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    Pull,
    Push,
}

/// Bounded ring of the most recent activity events, newest first.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    /// Prepends an entry, dropping the oldest once the ring is full.
    pub fn record(&mut self, entry: ActivityEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(ACTIVITY_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The reconciled analytics view read by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsView {
    snapshot: MetricsSnapshot,
    origin: Option<SnapshotOrigin>,
    activity: ActivityLog,
}

impl AnalyticsView {
    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    pub fn origin(&self) -> Option<SnapshotOrigin> {
        self.origin
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Applies one push-channel message in arrival order.
    pub fn apply_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::Metrics { metrics } => {
                self.snapshot = metrics;
                self.origin = Some(SnapshotOrigin::Push);
            }
            PushMessage::Activity { activity } => self.activity.record(activity),
        }
    }

    /// Applies one poll cycle's report: the buckets are reduced to a single
    /// aggregate which replaces the displayed counters. Never merged with
    /// earlier polls, so a sliding report window cannot double count.
    pub fn apply_report(&mut self, buckets: &[HourlyBucket]) {
        self.snapshot = reduce_report(buckets);
        self.origin = Some(SnapshotOrigin::Pull);
    }
}

/// Reduces one report's buckets to campaign totals.
///
/// The report carries no pending count of its own; it is derived as
/// `sent - delivered - failed` (saturating, in case a bucket set is
/// internally inconsistent).
fn reduce_report(buckets: &[HourlyBucket]) -> MetricsSnapshot {
    let mut sent = 0u64;
    let mut delivered = 0u64;
    let mut failed = 0u64;
    for bucket in buckets {
        sent += bucket.sent;
        delivered += bucket.delivered;
        failed += bucket.failed;
    }
    MetricsSnapshot {
        total: sent,
        pending: sent.saturating_sub(delivered).saturating_sub(failed),
        delivered,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use common::model::analytics::ActivityStatus;

    use super::*;

    fn entry(email: &str) -> ActivityEntry {
        ActivityEntry {
            time: "10:00:00".into(),
            email: email.into(),
            status: ActivityStatus::Delivered,
            details: String::new(),
        }
    }

    fn bucket(sent: u64, delivered: u64, failed: u64) -> HourlyBucket {
        HourlyBucket {
            sent,
            delivered,
            failed,
        }
    }

    #[test]
    fn metrics_push_replaces_the_snapshot_wholesale() {
        let mut view = AnalyticsView::default();
        view.apply_report(&[bucket(40, 30, 5)]);

        view.apply_push(PushMessage::Metrics {
            metrics: MetricsSnapshot {
                total: 100,
                pending: 0,
                delivered: 90,
                failed: 10,
            },
        });

        assert_eq!(
            *view.snapshot(),
            MetricsSnapshot {
                total: 100,
                pending: 0,
                delivered: 90,
                failed: 10,
            }
        );
        assert_eq!(view.origin(), Some(SnapshotOrigin::Push));
    }

    #[test]
    fn repolled_window_replaces_instead_of_accumulating() {
        let mut view = AnalyticsView::default();
        view.apply_report(&[bucket(5, 3, 1)]);
        view.apply_report(&[bucket(5, 5, 0)]);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.total, 5);
        assert_eq!(snapshot.delivered, 5);
        assert_eq!(snapshot.failed, 0);
        assert_eq!(snapshot.pending, 0);
    }

    #[test]
    fn report_buckets_sum_within_one_poll() {
        let mut view = AnalyticsView::default();
        view.apply_report(&[bucket(10, 6, 1), bucket(20, 15, 2), bucket(5, 5, 0)]);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.total, 35);
        assert_eq!(snapshot.delivered, 26);
        assert_eq!(snapshot.failed, 3);
        assert_eq!(snapshot.pending, 6);
        assert_eq!(view.origin(), Some(SnapshotOrigin::Pull));
    }

    #[test]
    fn inconsistent_buckets_saturate_pending_at_zero() {
        let mut view = AnalyticsView::default();
        view.apply_report(&[bucket(3, 4, 2)]);
        assert_eq!(view.snapshot().pending, 0);
    }

    #[test]
    fn last_received_update_wins_across_channels() {
        let mut view = AnalyticsView::default();

        view.apply_push(PushMessage::Metrics {
            metrics: MetricsSnapshot {
                total: 9,
                pending: 9,
                delivered: 0,
                failed: 0,
            },
        });
        view.apply_report(&[bucket(4, 4, 0)]);
        assert_eq!(view.snapshot().total, 4);
        assert_eq!(view.origin(), Some(SnapshotOrigin::Pull));

        view.apply_push(PushMessage::Metrics {
            metrics: MetricsSnapshot {
                total: 11,
                pending: 1,
                delivered: 10,
                failed: 0,
            },
        });
        assert_eq!(view.snapshot().total, 11);
        assert_eq!(view.origin(), Some(SnapshotOrigin::Push));
    }

    #[test]
    fn activity_events_do_not_disturb_the_counters() {
        let mut view = AnalyticsView::default();
        view.apply_report(&[bucket(4, 2, 0)]);
        let before = *view.snapshot();

        view.apply_push(PushMessage::Activity {
            activity: entry("a@x.com"),
        });
        assert_eq!(*view.snapshot(), before);
        assert_eq!(view.origin(), Some(SnapshotOrigin::Pull));
        assert_eq!(view.activity().len(), 1);
    }

    #[test]
    fn activity_ring_keeps_the_newest_ten_in_order() {
        let mut log = ActivityLog::default();
        for i in 0..13 {
            log.record(entry(&format!("r{i}@x.com")));
        }

        assert_eq!(log.len(), ACTIVITY_CAPACITY);
        let emails: Vec<_> = log.iter().map(|e| e.email.as_str()).collect();
        assert_eq!(emails.first(), Some(&"r12@x.com"));
        assert_eq!(emails.last(), Some(&"r3@x.com"));
        for window in emails.windows(2) {
            // Newest first: indices strictly decreasing.
            let a: u32 = window[0][1..window[0].find('@').unwrap()].parse().unwrap();
            let b: u32 = window[1][1..window[1].find('@').unwrap()].parse().unwrap();
            assert!(a > b);
        }
    }
}
