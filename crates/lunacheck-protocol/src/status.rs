//! The `getStatus` payload shape
//!
//! One row per sink, rebuilt and posted to every subscriber after each
//! state-changing call. Media fields are zeroed and `connectedSource` is
//! null while a sink is disconnected.

use crate::types::{Sink, Source, VideoRect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a single sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SinkStatus {
    /// Sink name
    pub sink: Sink,

    /// Whether a source is attached
    pub connected: bool,

    /// Client context owning the connection, `"unknown"` otherwise
    pub context: String,

    /// Blanking state
    pub muted: bool,

    /// Opacity, 0-255
    pub opacity: u8,

    /// Stacking position
    pub z_order: i32,

    /// Applied screen rectangle, zero until a window is set
    pub display_output: VideoRect,

    /// Applied source rectangle, zero until media data and a window exist
    pub source_input: VideoRect,

    /// Attached source, null when disconnected
    pub connected_source: Option<Source>,

    /// Port on the attached source
    pub connected_source_port: u8,

    /// Source frame rate, 0 until media data arrives
    pub frame_rate: f64,

    /// Content classification, `"unknown"` until media data arrives
    pub content_type: String,

    /// `"progressive"`, `"interlaced"`, or `"unknown"`
    pub scan_type: String,

    /// Source width, 0 until media data arrives
    pub width: u32,

    /// Source height, 0 until media data arrives
    pub height: u32,

    /// Whether the window covers the panel
    pub full_screen: bool,

    /// Source-specific extra info, null unless the client supplied one
    pub video_info: Value,
}

impl SinkStatus {
    /// Row for a sink with nothing attached
    pub fn disconnected(sink: Sink) -> Self {
        Self {
            sink,
            connected: false,
            context: "unknown".to_string(),
            muted: false,
            opacity: 0,
            z_order: 0,
            display_output: VideoRect::zero(),
            source_input: VideoRect::zero(),
            connected_source: None,
            connected_source_port: 0,
            frame_rate: 0.0,
            content_type: "unknown".to_string(),
            scan_type: "unknown".to_string(),
            width: 0,
            height: 0,
            full_screen: false,
            video_info: Value::Null,
        }
    }
}

/// The full `getStatus` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    /// One row per sink
    pub video: Vec<SinkStatus>,

    /// Always true on a well-formed status
    pub return_value: bool,

    /// Whether the payload went to a subscriber
    pub subscribed: bool,
}

impl StatusPayload {
    /// Build a subscribed status payload from sink rows
    pub fn subscribed(video: Vec<SinkStatus>) -> Self {
        Self {
            video,
            return_value: true,
            subscribed: true,
        }
    }
}
