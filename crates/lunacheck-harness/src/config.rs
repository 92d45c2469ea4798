//! Suite configuration
//!
//! Mirrors the knobs the conformance scripts expose: which sinks to drive,
//! which source feeds the tests, timing, and whether the register flow is in
//! use. Loads from YAML; everything has a default matching a single-sink
//! HDMI setup.

use crate::error::{HarnessError, Result};
use lunacheck_protocol::{Sink, Source};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

fn default_sinks() -> Vec<Sink> {
    vec![Sink::Main]
}

fn default_source() -> Source {
    Source::Hdmi
}

fn default_source_port() -> u8 {
    3
}

fn default_contexts() -> Vec<String> {
    vec!["pipeline1".to_string(), "pipeline2".to_string()]
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_update_timeout_ms() -> u64 {
    1000
}

fn default_negative_window_ms() -> u64 {
    100
}

fn default_negative_position() -> bool {
    true
}

fn default_panel_width() -> u32 {
    3840
}

fn default_panel_height() -> u32 {
    2160
}

/// Configuration shared by every scenario in a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Sinks the suite drives; SUB0 only works on dual-video hardware
    #[serde(default = "default_sinks")]
    pub sinks: Vec<Sink>,

    /// Source feeding the positive scenarios
    #[serde(default = "default_source")]
    pub source: Source,

    /// Port on the source
    #[serde(default = "default_source_port")]
    pub source_port: u8,

    /// Whether the register/unregister flow is exercised
    #[serde(default)]
    pub support_register: bool,

    /// Client contexts used when the register flow is on
    #[serde(default = "default_contexts")]
    pub contexts: Vec<String>,

    /// Pause between visual steps, milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// How long to wait for an expected subscription event, milliseconds
    #[serde(default = "default_update_timeout_ms")]
    pub update_timeout_ms: u64,

    /// How long to confirm the absence of an event, milliseconds
    #[serde(default = "default_negative_window_ms")]
    pub negative_window_ms: u64,

    /// Whether the build under test accepts off-panel window positions
    /// (crops them) instead of rejecting them
    #[serde(default = "default_negative_position")]
    pub support_negative_position: bool,

    /// Panel width the full-screen expectation is pinned to
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,

    /// Panel height the full-screen expectation is pinned to
    #[serde(default = "default_panel_height")]
    pub panel_height: u32,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            sinks: default_sinks(),
            source: default_source(),
            source_port: default_source_port(),
            support_register: false,
            contexts: default_contexts(),
            settle_ms: default_settle_ms(),
            update_timeout_ms: default_update_timeout_ms(),
            negative_window_ms: default_negative_window_ms(),
            support_negative_position: default_negative_position(),
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
        }
    }
}

impl SuiteConfig {
    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::Config(format!("read {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&text)
            .map_err(|e| HarnessError::Config(format!("parse {}: {}", path.display(), e)))
    }

    /// Pause between visual steps
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Wait for an expected subscription event
    pub fn update_timeout(&self) -> Duration {
        Duration::from_millis(self.update_timeout_ms)
    }

    /// Window for confirming no event arrives
    pub fn negative_window(&self) -> Duration {
        Duration::from_millis(self.negative_window_ms)
    }

    /// First configured context (the register flow's primary pipeline)
    pub fn primary_context(&self) -> Option<&str> {
        self.contexts.first().map(String::as_str)
    }

    /// Context to attach to calls, `None` when the register flow is off
    pub fn call_context(&self) -> Option<String> {
        if self.support_register {
            self.primary_context().map(str::to_string)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_single_sink_hdmi() {
        let config = SuiteConfig::default();
        assert_eq!(config.sinks, vec![Sink::Main]);
        assert_eq!(config.source, Source::Hdmi);
        assert_eq!(config.source_port, 3);
        assert!(!config.support_register);
        assert_eq!(config.update_timeout(), Duration::from_millis(1000));
        assert_eq!(config.negative_window(), Duration::from_millis(100));
    }

    #[test]
    fn test_call_context_gated_by_register_flag() {
        let mut config = SuiteConfig::default();
        assert_eq!(config.call_context(), None);
        config.support_register = true;
        assert_eq!(config.call_context().as_deref(), Some("pipeline1"));
    }

    #[test]
    fn test_load_yaml_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "sinks: [MAIN, SUB0]\nsource: VDEC\nsource_port: 0\nsettle_ms: 0"
        )
        .unwrap();

        let config = SuiteConfig::load(file.path()).unwrap();
        assert_eq!(config.sinks, vec![Sink::Main, Sink::Sub0]);
        assert_eq!(config.source, Source::Vdec);
        assert_eq!(config.source_port, 0);
        assert_eq!(config.settle(), Duration::ZERO);
        // Unspecified fields keep their defaults.
        assert_eq!(config.panel_width, 3840);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sink: MAIN").unwrap();
        assert!(matches!(
            SuiteConfig::load(file.path()),
            Err(HarnessError::Config(_))
        ));
    }
}
