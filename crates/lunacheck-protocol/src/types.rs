//! Common wire enums and geometry
//!
//! String spellings match the service exactly: sinks and sources are
//! upper-case identifiers, scan types are lower-case words.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A video sink (hardware plane) exposed by the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sink {
    /// Primary plane
    #[serde(rename = "MAIN")]
    Main,

    /// First secondary plane, present on dual-video hardware
    #[serde(rename = "SUB0")]
    Sub0,
}

impl Sink {
    /// Wire spelling of the sink name
    pub fn as_str(&self) -> &'static str {
        match self {
            Sink::Main => "MAIN",
            Sink::Sub0 => "SUB0",
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sink {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MAIN" => Ok(Sink::Main),
            "SUB0" => Ok(Sink::Sub0),
            other => Err(format!("unknown sink: {}", other)),
        }
    }
}

/// A video source feeding a sink
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Source {
    /// Video decoder output
    #[serde(rename = "VDEC")]
    Vdec,

    /// HDMI input port
    #[serde(rename = "HDMI")]
    Hdmi,

    /// Still-image decoder
    #[serde(rename = "JPEG")]
    Jpeg,
}

impl Source {
    /// Wire spelling of the source name
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Vdec => "VDEC",
            Source::Hdmi => "HDMI",
            Source::Jpeg => "JPEG",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "VDEC" => Ok(Source::Vdec),
            "HDMI" => Ok(Source::Hdmi),
            "JPEG" => Ok(Source::Jpeg),
            other => Err(format!("unknown source: {}", other)),
        }
    }
}

/// Output mode for `connect`
///
/// Only display output is exercised by this suite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputMode {
    /// Route the source to the display pipeline
    #[serde(rename = "DISPLAY")]
    Display,
}

/// Scan type reported with media data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    /// Progressive frames
    Progressive,
    /// Interlaced fields
    Interlaced,
}

/// A rectangle in screen or source coordinates
///
/// Positions may be negative (off-screen placement tests rely on it);
/// dimensions may not.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl VideoRect {
    /// Create a rectangle
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// A zero rect, the service's "not set" value
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether both dimensions are non-zero
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Scale both dimensions by a ratio, keeping the position
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            x: self.x,
            y: self.y,
            width: (self.width as f64 * ratio) as u32,
            height: (self.height as f64 * ratio) as u32,
        }
    }

    /// Whether `other` lies entirely within this rectangle
    pub fn contains(&self, other: &VideoRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x.saturating_add(other.width as i32) <= self.x.saturating_add(self.width as i32)
            && other.y.saturating_add(other.height as i32)
                <= self.y.saturating_add(self.height as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sink_wire_spelling() {
        assert_eq!(serde_json::to_value(Sink::Main).unwrap(), json!("MAIN"));
        assert_eq!(serde_json::to_value(Sink::Sub0).unwrap(), json!("SUB0"));
    }

    #[test]
    fn test_source_round_trip() {
        for source in [Source::Vdec, Source::Hdmi, Source::Jpeg] {
            let value = serde_json::to_value(source).unwrap();
            let back: Source = serde_json::from_value(value).unwrap();
            assert_eq!(back, source);
        }
    }

    #[test]
    fn test_scan_type_is_lowercase() {
        assert_eq!(
            serde_json::to_value(ScanType::Progressive).unwrap(),
            json!("progressive")
        );
    }

    #[test]
    fn test_rect_serializes_flat() {
        let rect = VideoRect::new(400, 400, 1920, 1080);
        assert_eq!(
            serde_json::to_value(rect).unwrap(),
            json!({"x": 400, "y": 400, "width": 1920, "height": 1080})
        );
    }

    #[test]
    fn test_rect_contains() {
        let screen = VideoRect::sized(3840, 2160);
        assert!(screen.contains(&VideoRect::new(400, 400, 1920, 1080)));
        assert!(!screen.contains(&VideoRect::new(2880, 0, 1920, 1080)));
        assert!(!screen.contains(&VideoRect::new(-100, 0, 1920, 1080)));
    }

    #[test]
    fn test_rect_scaled() {
        let rect = VideoRect::new(10, 20, 1920, 1080);
        let half = rect.scaled(0.5);
        assert_eq!(half, VideoRect::new(10, 20, 960, 540));
    }
}
