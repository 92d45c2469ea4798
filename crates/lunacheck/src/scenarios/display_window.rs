//! Window geometry scenarios
//!
//! The applied rectangles depend on the order media data and window
//! placement arrive in, so both orders are scripted, plus the full-screen
//! expansion. Expected rects are literal.

use super::{FRAME_RATE, SOURCE_HEIGHT, SOURCE_WIDTH, connect, mute, primary_sink, windowed_request};
use async_trait::async_trait;
use lunacheck_harness::{Result, Scenario, ScenarioContext};
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{DisplayWindowRequest, ToParams, VideoDataRequest};
use lunacheck_protocol::VideoRect;
use serde_json::json;

const OUTPUT_RECT: VideoRect = VideoRect {
    x: 400,
    y: 400,
    width: 1920,
    height: 1080,
};

fn zero_rect() -> serde_json::Value {
    json!({"x": 0, "y": 0, "width": 0, "height": 0})
}

fn rect_json(rect: VideoRect) -> serde_json::Value {
    json!({"x": rect.x, "y": rect.y, "width": rect.width, "height": rect.height})
}

/// Window first, media second
pub struct DisplayWindowThenVideoData;

#[async_trait]
impl Scenario for DisplayWindowThenVideoData {
    fn name(&self) -> &str {
        "display_window_then_video_data"
    }

    fn summary(&self) -> &str {
        "a window set before media keeps a zero source rect until data arrives"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let sink = primary_sink(ctx);
        connect(ctx, sink, config.source, config.source_port).await?;

        ctx.step("setDisplayWindow");
        ctx.check_call_success_with_update(
            methods::SET_DISPLAY_WINDOW,
            windowed_request(ctx, sink, OUTPUT_RECT).to_params()?,
            json!({"video": [{
                "sink": sink.as_str(),
                "fullScreen": false,
                "width": 0,
                "height": 0,
                "frameRate": 0,
                // No media data yet, so the applied source rect is unknown.
                "sourceInput": zero_rect(),
                "displayOutput": rect_json(OUTPUT_RECT),
            }]}),
        )
        .await?;

        ctx.step("setVideoData");
        let mut request = VideoDataRequest::media(sink, SOURCE_WIDTH, SOURCE_HEIGHT, FRAME_RATE)
            .with_adaptive(false);
        if let Some(context) = config.call_context() {
            request = request.with_context(context);
        }
        ctx.check_call_success_with_update(
            methods::SET_VIDEO_DATA,
            request.to_params()?,
            json!({"video": [{
                "sink": sink.as_str(),
                "fullScreen": false,
                "width": SOURCE_WIDTH,
                "height": SOURCE_HEIGHT,
                "frameRate": FRAME_RATE,
                "sourceInput": {"x": 0, "y": 0, "width": SOURCE_WIDTH, "height": SOURCE_HEIGHT},
                "displayOutput": rect_json(OUTPUT_RECT),
            }]}),
        )
        .await?;

        mute(ctx, sink, false).await?;
        ctx.settle().await;
        Ok(())
    }
}

/// Media first, window second
pub struct VideoDataThenDisplayWindow;

#[async_trait]
impl Scenario for VideoDataThenDisplayWindow {
    fn name(&self) -> &str {
        "video_data_then_display_window"
    }

    fn summary(&self) -> &str {
        "media set before a window keeps both rects zero until placement"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let sink = primary_sink(ctx);
        connect(ctx, sink, config.source, config.source_port).await?;

        ctx.step("setVideoData");
        let mut request = VideoDataRequest::media(sink, SOURCE_WIDTH, SOURCE_HEIGHT, FRAME_RATE)
            .with_adaptive(false);
        if let Some(context) = config.call_context() {
            request = request.with_context(context);
        }
        ctx.check_call_success_with_update(
            methods::SET_VIDEO_DATA,
            request.to_params()?,
            json!({"video": [{
                "sink": sink.as_str(),
                "fullScreen": false,
                "width": SOURCE_WIDTH,
                "height": SOURCE_HEIGHT,
                "frameRate": FRAME_RATE,
                "sourceInput": zero_rect(),
                "displayOutput": zero_rect(),
            }]}),
        )
        .await?;

        ctx.step("setDisplayWindow");
        ctx.check_call_success_with_update(
            methods::SET_DISPLAY_WINDOW,
            windowed_request(ctx, sink, OUTPUT_RECT).to_params()?,
            json!({"video": [{
                "sink": sink.as_str(),
                "fullScreen": false,
                "width": SOURCE_WIDTH,
                "height": SOURCE_HEIGHT,
                "frameRate": FRAME_RATE,
                "sourceInput": {"x": 0, "y": 0, "width": SOURCE_WIDTH, "height": SOURCE_HEIGHT},
                "displayOutput": rect_json(OUTPUT_RECT),
            }]}),
        )
        .await?;

        mute(ctx, sink, false).await?;
        ctx.settle().await;
        Ok(())
    }
}

/// Full-screen placement expands to the panel
pub struct SetFullscreen;

#[async_trait]
impl Scenario for SetFullscreen {
    fn name(&self) -> &str {
        "set_fullscreen"
    }

    fn summary(&self) -> &str {
        "fullScreen true expands the window to the panel resolution"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let sink = primary_sink(ctx);
        connect(ctx, sink, config.source, config.source_port).await?;

        ctx.step("setVideoData");
        let mut request = VideoDataRequest::media(sink, SOURCE_WIDTH, SOURCE_HEIGHT, FRAME_RATE)
            .with_adaptive(false);
        if let Some(context) = config.call_context() {
            request = request.with_context(context);
        }
        ctx.check_call_success_with_update(
            methods::SET_VIDEO_DATA,
            request.to_params()?,
            json!({"video": [{
                "sink": sink.as_str(),
                "fullScreen": false,
                "width": SOURCE_WIDTH,
                "height": SOURCE_HEIGHT,
                "frameRate": FRAME_RATE,
                "sourceInput": zero_rect(),
                "displayOutput": zero_rect(),
            }]}),
        )
        .await?;

        ctx.step("setDisplayWindow fullScreen");
        let mut request = DisplayWindowRequest::full_screen(sink)
            .with_source_input(VideoRect::sized(SOURCE_WIDTH, SOURCE_HEIGHT));
        if let Some(context) = config.call_context() {
            request = request.with_context(context);
        }
        ctx.check_call_success_with_update(
            methods::SET_DISPLAY_WINDOW,
            request.to_params()?,
            json!({"video": [{
                "sink": sink.as_str(),
                "fullScreen": true,
                "width": SOURCE_WIDTH,
                "height": SOURCE_HEIGHT,
                "frameRate": FRAME_RATE,
                "sourceInput": {"x": 0, "y": 0, "width": SOURCE_WIDTH, "height": SOURCE_HEIGHT},
                "displayOutput": {
                    "x": 0, "y": 0,
                    "width": config.panel_width, "height": config.panel_height,
                },
            }]}),
        )
        .await?;

        mute(ctx, sink, false).await?;
        ctx.settle().await;
        Ok(())
    }
}
