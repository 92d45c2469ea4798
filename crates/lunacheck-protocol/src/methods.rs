//! Method names registered by the videooutput service
//!
//! The service registers its methods on two categories, `/` and `/display`.
//! Constants here carry the category prefix the way `luna-send` expects them,
//! relative to [`SERVICE_URI`].

/// Bus URI prefix for the service under test.
pub const SERVICE_URI: &str = "luna://com.webos.service.videooutput/";

/// Register a client context for later calls.
pub const REGISTER: &str = "register";

/// Drop a previously registered client context.
pub const UNREGISTER: &str = "unregister";

/// Connect a video source to a sink.
pub const CONNECT: &str = "connect";

/// Disconnect a sink from its source.
pub const DISCONNECT: &str = "disconnect";

/// Push media properties (size, frame rate, scan type) for a connected sink.
pub const SET_VIDEO_DATA: &str = "setVideoData";

/// Mute or unmute video on a sink.
pub const BLANK_VIDEO: &str = "blankVideo";

/// Current sink status; subscribable.
pub const GET_STATUS: &str = "getStatus";

/// Scaling limits of a connected sink.
pub const GET_VIDEO_LIMITS: &str = "display/getVideoLimits";

/// Hardware plane capabilities.
pub const GET_OUTPUT_CAPABILITIES: &str = "display/getOutputCapabilities";

/// Resolutions supported per connector.
pub const GET_SUPPORTED_RESOLUTIONS: &str = "display/getSupportedResolutions";

/// Position and scale the video window on screen.
pub const SET_DISPLAY_WINDOW: &str = "display/setDisplayWindow";

/// Change the panel resolution.
pub const SET_DISPLAY_RESOLUTION: &str = "display/setDisplayResolution";

/// Set z-order and opacity across sinks.
pub const SET_COMPOSITING: &str = "display/setCompositing";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_uri_is_luna_scheme() {
        assert!(SERVICE_URI.starts_with("luna://"));
        assert!(SERVICE_URI.ends_with('/'));
    }

    #[test]
    fn test_display_category_methods_carry_prefix() {
        assert_eq!(SET_DISPLAY_WINDOW, "display/setDisplayWindow");
        assert_eq!(SET_COMPOSITING, "display/setCompositing");
    }
}
