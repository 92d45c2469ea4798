//! Request payload builders for the control calls the suite issues
//!
//! Each struct serializes to the exact camelCase JSON the service parses.
//! Optional fields are omitted, not sent as null; the service treats a
//! missing `context` differently from an empty one.

use crate::error::Result;
use crate::types::{OutputMode, ScanType, Sink, Source, VideoRect};
use serde::Serialize;

/// Serialize a request into the JSON object `luna-send` posts
pub trait ToParams: Serialize {
    /// Wire form of the request
    fn to_params(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<T: Serialize> ToParams for T {}

/// `register`: announce a client context
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Client context identifier
    pub context: String,
}

impl RegisterRequest {
    /// Register the given context
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

/// `connect`: attach a source to a sink
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// Always `DISPLAY` in this suite
    pub output_mode: OutputMode,

    /// Target sink
    pub sink: Sink,

    /// Source to attach
    pub source: Source,

    /// Port index on the source
    pub source_port: u8,

    /// Registered client context, if the register flow is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ConnectRequest {
    /// Connect `source`:`source_port` to `sink` for display output
    pub fn new(sink: Sink, source: Source, source_port: u8) -> Self {
        Self {
            output_mode: OutputMode::Display,
            sink,
            source,
            source_port,
            context: None,
        }
    }

    /// Attach a client context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// `disconnect`: detach whatever is connected to a sink
#[derive(Debug, Clone, Serialize)]
pub struct DisconnectRequest {
    /// Target sink
    pub sink: Sink,

    /// Registered client context, if the register flow is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl DisconnectRequest {
    /// Disconnect `sink`
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            context: None,
        }
    }

    /// Attach a client context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// `blankVideo`: mute or unmute a sink
#[derive(Debug, Clone, Serialize)]
pub struct BlankVideoRequest {
    /// Target sink
    pub sink: Sink,

    /// `true` blanks (mutes) the sink
    pub blank: bool,
}

impl BlankVideoRequest {
    /// Set blanking on `sink`
    pub fn new(sink: Sink, blank: bool) -> Self {
        Self { sink, blank }
    }
}

/// `setVideoData`: media properties for a connected sink
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDataRequest {
    /// Target sink
    pub sink: Sink,

    /// Registered client context, if the register flow is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Content classification, `media` for these tests
    pub content_type: String,

    /// Source frame rate
    pub frame_rate: f64,

    /// Source width in pixels
    pub width: u32,

    /// Source height in pixels
    pub height: u32,

    /// Scan type of the source
    pub scan_type: ScanType,

    /// Adaptive streaming flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive: Option<bool>,
}

impl VideoDataRequest {
    /// Media data for `sink`: `width`x`height` at `frame_rate`, progressive
    pub fn media(sink: Sink, width: u32, height: u32, frame_rate: f64) -> Self {
        Self {
            sink,
            context: None,
            content_type: "media".to_string(),
            frame_rate,
            width,
            height,
            scan_type: ScanType::Progressive,
            adaptive: None,
        }
    }

    /// Attach a client context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the adaptive flag
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = Some(adaptive);
        self
    }
}

/// `display/setDisplayWindow`: position the video window
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayWindowRequest {
    /// Target sink
    pub sink: Sink,

    /// Registered client context, if the register flow is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Expand to the full panel, ignoring `display_output`
    pub full_screen: bool,

    /// Region of the source to show
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_input: Option<VideoRect>,

    /// Region of the screen to cover
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_output: Option<VideoRect>,

    /// Per-sink opacity, 0-255
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
}

impl DisplayWindowRequest {
    /// Windowed placement: show `source_input` inside `display_output`
    pub fn windowed(sink: Sink, source_input: VideoRect, display_output: VideoRect) -> Self {
        Self {
            sink,
            context: None,
            full_screen: false,
            source_input: Some(source_input),
            display_output: Some(display_output),
            opacity: None,
        }
    }

    /// Full-screen placement
    pub fn full_screen(sink: Sink) -> Self {
        Self {
            sink,
            context: None,
            full_screen: true,
            source_input: None,
            display_output: None,
            opacity: None,
        }
    }

    /// Restrict the visible source region
    pub fn with_source_input(mut self, rect: VideoRect) -> Self {
        self.source_input = Some(rect);
        self
    }

    /// Attach a client context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the window opacity
    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// One entry of a `display/setCompositing` ordering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeOrder {
    /// Sink the entry applies to
    pub sink: Sink,

    /// Opacity, 0-255
    pub opacity: u8,

    /// Stacking position, 0 is bottom; must be unique across sinks
    pub z_order: i32,
}

impl ComposeOrder {
    /// Compose entry for `sink`
    pub fn new(sink: Sink, opacity: u8, z_order: i32) -> Self {
        Self {
            sink,
            opacity,
            z_order,
        }
    }
}

/// `display/setCompositing`: z-order and opacity across sinks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositingRequest {
    /// Requested ordering, one entry per sink
    pub compose_order: Vec<ComposeOrder>,
}

impl CompositingRequest {
    /// Compose the given entries
    pub fn new(compose_order: Vec<ComposeOrder>) -> Self {
        Self { compose_order }
    }
}

/// `getStatus`: snapshot or subscription
#[derive(Debug, Clone, Serialize)]
pub struct GetStatusRequest {
    /// Subscribe for updates rather than a one-shot snapshot
    pub subscribe: bool,
}

impl GetStatusRequest {
    /// Subscribing status request
    pub fn subscribed() -> Self {
        Self { subscribe: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_request_wire_form() {
        let params = ConnectRequest::new(Sink::Main, Source::Hdmi, 3)
            .to_params()
            .unwrap();
        assert_eq!(
            params,
            json!({
                "outputMode": "DISPLAY",
                "sink": "MAIN",
                "source": "HDMI",
                "sourcePort": 3,
            })
        );
    }

    #[test]
    fn test_connect_request_with_context() {
        let params = ConnectRequest::new(Sink::Main, Source::Vdec, 0)
            .with_context("pipeline1")
            .to_params()
            .unwrap();
        assert_eq!(params["context"], json!("pipeline1"));
    }

    #[test]
    fn test_video_data_request_wire_form() {
        let params = VideoDataRequest::media(Sink::Main, 1920, 1080, 29.5)
            .with_adaptive(false)
            .to_params()
            .unwrap();
        assert_eq!(
            params,
            json!({
                "sink": "MAIN",
                "contentType": "media",
                "frameRate": 29.5,
                "width": 1920,
                "height": 1080,
                "scanType": "progressive",
                "adaptive": false,
            })
        );
    }

    #[test]
    fn test_display_window_omits_unset_fields() {
        let params = DisplayWindowRequest::full_screen(Sink::Main)
            .to_params()
            .unwrap();
        assert_eq!(params, json!({"sink": "MAIN", "fullScreen": true}));
    }

    #[test]
    fn test_compositing_request_wire_form() {
        let params = CompositingRequest::new(vec![
            ComposeOrder::new(Sink::Main, 20, 1),
            ComposeOrder::new(Sink::Sub0, 31, 0),
        ])
        .to_params()
        .unwrap();
        assert_eq!(
            params,
            json!({
                "composeOrder": [
                    {"sink": "MAIN", "opacity": 20, "zOrder": 1},
                    {"sink": "SUB0", "opacity": 31, "zOrder": 0},
                ]
            })
        );
    }
}
