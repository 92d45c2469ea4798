//! Scenario scripts and shared steps
//!
//! The step helpers here are the vocabulary every scenario is written in:
//! connect, disconnect, and mute, each asserting both the call result and
//! the status event it provokes. Expected payloads are literal; the point
//! of a conformance suite is that the wire shapes are spelled out.

mod compositing;
mod connect;
mod display_window;
mod mute;
mod negative;
mod positions;
mod register;

use lunacheck_harness::{Registry, Result, ScenarioContext};
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{
    BlankVideoRequest, ConnectRequest, DisconnectRequest, DisplayWindowRequest, ToParams,
    VideoDataRequest,
};
use lunacheck_protocol::{Sink, Source, VideoRect};
use serde_json::json;

/// Register every scenario in suite order
pub fn register_all() -> Registry {
    let mut registry = Registry::new();
    registry.register(connect::ConnectDisconnect);
    registry.register(connect::DualConnect);
    registry.register(mute::Mute);
    registry.register(display_window::DisplayWindowThenVideoData);
    registry.register(display_window::VideoDataThenDisplayWindow);
    registry.register(display_window::SetFullscreen);
    registry.register(compositing::SetCompositing);
    registry.register(positions::PositionSweep);
    registry.register(positions::RandomPosition);
    registry.register(positions::LinearMove);
    registry.register(positions::LinearSizeChange);
    registry.register(register::RegisterLifecycle);
    registry.register(negative::ConnectRejectsBadArgs);
    registry.register(negative::RejectedWhenDisconnected);
    registry.register(negative::DisplayWindowScaleLimits);
    registry.register(negative::VideoDataRejectsBadScanType);
    registry
}

/// The sink most scenarios drive: the first configured one
pub(crate) fn primary_sink(ctx: &ScenarioContext) -> Sink {
    ctx.config().sinks.first().copied().unwrap_or(Sink::Main)
}

/// Connect and expect the status feed to reflect the new source
pub(crate) async fn connect(
    ctx: &ScenarioContext,
    sink: Sink,
    source: Source,
    port: u8,
) -> Result<()> {
    ctx.step(format!("connect {}", sink));
    let mut request = ConnectRequest::new(sink, source, port);
    if let Some(context) = ctx.config().call_context() {
        request = request.with_context(context);
    }
    ctx.check_call_success_with_update(
        methods::CONNECT,
        request.to_params()?,
        json!({"video": [{
            "sink": sink.as_str(),
            "connectedSource": source.as_str(),
            "connectedSourcePort": port,
        }]}),
    )
    .await?;
    Ok(())
}

/// Disconnect and expect the source to drop out of the status feed
///
/// Carries the same context the connect did; the service binds clients by
/// context, and an asymmetric disconnect strands the implicit client.
pub(crate) async fn disconnect(ctx: &ScenarioContext, sink: Sink) -> Result<()> {
    ctx.step(format!("disconnect {}", sink));
    let mut request = DisconnectRequest::new(sink);
    if let Some(context) = ctx.config().call_context() {
        request = request.with_context(context);
    }
    ctx.check_call_success_with_update(
        methods::DISCONNECT,
        request.to_params()?,
        json!({"video": [{"sink": sink.as_str(), "connectedSource": null}]}),
    )
    .await?;
    Ok(())
}

/// Blank or unblank and expect the muted flag to follow
pub(crate) async fn mute(ctx: &ScenarioContext, sink: Sink, blank: bool) -> Result<()> {
    ctx.step(format!("mute {} -> {}", sink, blank));
    ctx.check_call_success_with_update(
        methods::BLANK_VIDEO,
        BlankVideoRequest::new(sink, blank).to_params()?,
        json!({"video": [{"sink": sink.as_str(), "muted": blank}]}),
    )
    .await?;
    Ok(())
}

/// Push the suite's standard media data and expect it echoed in status
pub(crate) async fn set_media_data(ctx: &ScenarioContext, sink: Sink) -> Result<()> {
    ctx.step("setVideoData");
    let mut request = VideoDataRequest::media(sink, SOURCE_WIDTH, SOURCE_HEIGHT, FRAME_RATE);
    if let Some(context) = ctx.config().call_context() {
        request = request.with_context(context);
    }
    ctx.check_call_success_with_update(
        methods::SET_VIDEO_DATA,
        request.to_params()?,
        json!({"video": [{
            "sink": sink.as_str(),
            "width": SOURCE_WIDTH,
            "height": SOURCE_HEIGHT,
            "frameRate": FRAME_RATE,
        }]}),
    )
    .await?;
    Ok(())
}

/// A windowed display-window request with the suite's standard source rect
pub(crate) fn windowed_request(ctx: &ScenarioContext, sink: Sink, output: VideoRect) -> DisplayWindowRequest {
    let mut request =
        DisplayWindowRequest::windowed(sink, VideoRect::sized(SOURCE_WIDTH, SOURCE_HEIGHT), output);
    if let Some(context) = ctx.config().call_context() {
        request = request.with_context(context);
    }
    request
}

/// Media width every scenario feeds
pub(crate) const SOURCE_WIDTH: u32 = 1920;
/// Media height every scenario feeds
pub(crate) const SOURCE_HEIGHT: u32 = 1080;
/// Media frame rate every scenario feeds
pub(crate) const FRAME_RATE: f64 = 29.5;
