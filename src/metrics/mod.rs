use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated over one call session.
#[derive(Debug, Default, Clone)]
pub struct SessionMetrics {
    reconcile_passes: u64,
    layout_changes: u64,
    anomalies: u64,
    overlay_transitions: u64,
    messages: u64,
    suppressed_intents: u64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reconcile(&mut self, layout_changed: bool) {
        self.reconcile_passes = self.reconcile_passes.saturating_add(1);
        if layout_changed {
            self.layout_changes = self.layout_changes.saturating_add(1);
        }
    }

    pub fn record_anomaly(&mut self) {
        self.anomalies = self.anomalies.saturating_add(1);
    }

    pub fn record_overlay_transition(&mut self) {
        self.overlay_transitions = self.overlay_transitions.saturating_add(1);
    }

    pub fn record_message(&mut self) {
        self.messages = self.messages.saturating_add(1);
    }

    pub fn record_suppressed_intent(&mut self) {
        self.suppressed_intents = self.suppressed_intents.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            reconcile_passes: self.reconcile_passes,
            layout_changes: self.layout_changes,
            anomalies: self.anomalies,
            overlay_transitions: self.overlay_transitions,
            messages: self.messages,
            suppressed_intents: self.suppressed_intents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub reconcile_passes: u64,
    pub layout_changes: u64,
    pub anomalies: u64,
    pub overlay_transitions: u64,
    pub messages: u64,
    pub suppressed_intents: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("reconcile_passes".to_string(), json!(self.reconcile_passes));
        map.insert("layout_changes".to_string(), json!(self.layout_changes));
        map.insert("anomalies".to_string(), json!(self.anomalies));
        map.insert(
            "overlay_transitions".to_string(),
            json!(self.overlay_transitions),
        );
        map.insert("messages".to_string(), json!(self.messages));
        map.insert(
            "suppressed_intents".to_string(),
            json!(self.suppressed_intents),
        );
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "session_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_carries_counters() {
        let mut metrics = SessionMetrics::new();
        metrics.record_reconcile(true);
        metrics.record_reconcile(false);
        metrics.record_anomaly();
        let snap = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snap.reconcile_passes, 2);
        assert_eq!(snap.layout_changes, 1);
        assert_eq!(snap.anomalies, 1);
        assert_eq!(snap.uptime_ms, 1500);

        let event = snap.to_log_event("call_room::session.metrics");
        assert_eq!(event.message, "session_metrics");
        assert_eq!(event.field("reconcile_passes"), Some(&json!(2)));
    }
}
