//! Session configuration.
//!
//! Plain settings deserialize from JSON; runtime handles (logger, metrics)
//! are attached afterwards through `CallRoom::config_mut`.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SessionError};
use crate::layout::LayoutConfig;
use crate::logging::{FileSink, Logger};
use crate::metrics::SessionMetrics;

fn default_quick_messages() -> Vec<String> {
    [
        "Can you hear me?",
        "I can't hear you",
        "Be right back",
        "Sorry, I have to go",
        "Please mute your mic",
        "Thanks everyone!",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay before the controls bar hides itself.
    pub auto_hide_ms: u64,
    /// Viewport height used until the renderer reports one.
    pub viewport_height: f32,
    pub layout: LayoutConfig,
    /// Presets offered by the quick-messages overlay.
    pub quick_messages: Vec<String>,
    /// Whether the device can switch cameras at all.
    pub flip_camera_supported: bool,
    /// Labels are cut to this many display columns.
    pub label_max_width: usize,
    /// Interval between metrics snapshots. Zero disables them.
    pub metrics_interval_ms: u64,
    #[serde(skip)]
    pub logger: Option<Logger>,
    #[serde(skip)]
    pub metrics: Option<Arc<Mutex<SessionMetrics>>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_hide_ms: 3_000,
            viewport_height: 800.0,
            layout: LayoutConfig::default(),
            quick_messages: default_quick_messages(),
            flip_camera_supported: true,
            label_max_width: 18,
            metrics_interval_ms: 0,
            logger: None,
            metrics: None,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("auto_hide_ms", &self.auto_hide_ms)
            .field("viewport_height", &self.viewport_height)
            .field("layout", &self.layout)
            .field("quick_messages", &self.quick_messages)
            .field("flip_camera_supported", &self.flip_camera_supported)
            .field("label_max_width", &self.label_max_width)
            .field("metrics_interval_ms", &self.metrics_interval_ms)
            .field("logger", &self.logger.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Route session logs to a JSON-lines file capped at `max_bytes`.
    pub fn attach_file_log(&mut self, path: impl AsRef<Path>, max_bytes: u64) -> Result<()> {
        let sink = FileSink::new(path, max_bytes)?;
        self.logger = Some(Logger::new(sink));
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate().map_err(SessionError::InvalidConfig)?;
        if self.auto_hide_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "auto_hide_ms must be greater than zero".to_string(),
            ));
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(SessionError::InvalidConfig(format!(
                "viewport_height must be positive, got {}",
                self.viewport_height
            )));
        }
        if self.label_max_width == 0 {
            return Err(SessionError::InvalidConfig(
                "label_max_width must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn auto_hide_delay(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SessionMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SessionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auto_hide_delay(), Duration::from_secs(3));
        assert!(!config.quick_messages.is_empty());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            SessionConfig::from_json_str(r#"{"auto_hide_ms": 5000, "layout": {"focus_ratio": 0.6}}"#)
                .unwrap();
        assert_eq!(config.auto_hide_ms, 5000);
        assert_eq!(config.layout.focus_ratio, 0.6);
        assert_eq!(config.layout.strip_ratio, 0.3);
        assert!(config.flip_camera_supported);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = SessionConfig::from_json_str(r#"{"auto_hide_ms": 0}"#).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));

        let err = SessionConfig::from_json_str(r#"{"layout": {"grid_fill_ratio": 1.5}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("grid_fill_ratio"));

        let err = SessionConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, SessionError::ConfigParse(_)));
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("call_room-{}-{name}", std::process::id()))
    }

    #[test]
    fn debug_output_hides_runtime_handles() {
        let mut config = SessionConfig::default();
        config.enable_metrics();
        let text = format!("{config:?}");
        assert!(text.contains("auto_hide_ms: 3000"));
        assert!(text.contains("metrics: true"));
        assert!(text.contains("logger: false"));
    }

    #[test]
    fn config_file_round_trip_and_missing_file() {
        let path = scratch_path("config.json");
        std::fs::write(&path, r#"{"label_max_width": 12}"#).unwrap();
        let config = SessionConfig::from_json_file(&path).unwrap();
        assert_eq!(config.label_max_width, 12);
        std::fs::remove_file(&path).unwrap();

        let err = SessionConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }

    #[test]
    fn file_log_attaches_or_reports_sink_failure() {
        let path = scratch_path("session.log");
        let mut config = SessionConfig::default();
        config.attach_file_log(&path, 0).unwrap();
        let logger = config.logger.as_ref().unwrap();
        logger
            .log(crate::logging::LogLevel::Info, "call_room::session", "hello")
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"message\":\"hello\""));
        std::fs::remove_file(&path).unwrap();

        let unreachable = scratch_path("no-such-dir").join("session.log");
        let err = config.attach_file_log(&unreachable, 0).unwrap_err();
        assert!(matches!(err, SessionError::Logging(_)));
    }
}
