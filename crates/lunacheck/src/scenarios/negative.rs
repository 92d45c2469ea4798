//! Negative scenarios
//!
//! Bad requests must fail with the service's documented error codes and
//! must not leak a status event to subscribers.

use super::{connect, primary_sink, windowed_request};
use async_trait::async_trait;
use lunacheck_harness::{HarnessError, Result, Scenario, ScenarioContext};
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{
    BlankVideoRequest, DisconnectRequest, DisplayWindowRequest, ToParams, VideoDataRequest,
};
use lunacheck_protocol::response::error_codes;
use lunacheck_protocol::{CallReturn, VideoRect};
use serde_json::{Value, json};

fn expect_error_code(method: &str, response: &Value, expected: i64) -> Result<()> {
    let got = CallReturn::new(response).error_code();
    if got != Some(expected) {
        return Err(HarnessError::WrongErrorCode {
            method: method.to_string(),
            expected,
            got,
            response: response.clone(),
        });
    }
    Ok(())
}

/// Unknown sinks and sources are refused outright
pub struct ConnectRejectsBadArgs;

#[async_trait]
impl Scenario for ConnectRejectsBadArgs {
    fn name(&self) -> &str {
        "connect_rejects_bad_args"
    }

    fn summary(&self) -> &str {
        "connect with an unknown sink or source fails silently with error 4"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        ctx.step("connect to unknown sink");
        let response = ctx
            .check_call_fail_no_update(
                methods::CONNECT,
                json!({"outputMode": "DISPLAY", "sink": "MAIN9", "source": "HDMI", "sourcePort": 0}),
            )
            .await?;
        expect_error_code(methods::CONNECT, &response, error_codes::INVALID_PARAMETERS)?;

        ctx.step("connect to unknown source");
        let response = ctx
            .check_call_fail_no_update(
                methods::CONNECT,
                json!({"outputMode": "DISPLAY", "sink": "MAIN", "source": "TAPE", "sourcePort": 0}),
            )
            .await?;
        expect_error_code(methods::CONNECT, &response, error_codes::INVALID_PARAMETERS)?;
        Ok(())
    }
}

/// Calls that need a connection are refused without one
pub struct RejectedWhenDisconnected;

#[async_trait]
impl Scenario for RejectedWhenDisconnected {
    fn name(&self) -> &str {
        "rejected_when_disconnected"
    }

    fn summary(&self) -> &str {
        "disconnect, setVideoData and setDisplayWindow fail on an idle sink"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let sink = primary_sink(ctx);

        ctx.step("disconnect while idle");
        let response = ctx
            .check_call_fail_no_update(
                methods::DISCONNECT,
                DisconnectRequest::new(sink).to_params()?,
            )
            .await?;
        expect_error_code(
            methods::DISCONNECT,
            &response,
            error_codes::VIDEO_NOT_CONNECTED,
        )?;

        // With no connection there is no client bound to the sink, so these
        // fail on the client lookup, not the connection check.
        ctx.step("setVideoData while idle");
        let response = ctx
            .check_call_fail_no_update(
                methods::SET_VIDEO_DATA,
                VideoDataRequest::media(sink, 1920, 1080, 29.5).to_params()?,
            )
            .await?;
        expect_error_code(
            methods::SET_VIDEO_DATA,
            &response,
            error_codes::INVALID_PARAMETERS,
        )?;

        ctx.step("setDisplayWindow while idle");
        let response = ctx
            .check_call_fail_no_update(
                methods::SET_DISPLAY_WINDOW,
                DisplayWindowRequest::full_screen(sink).to_params()?,
            )
            .await?;
        expect_error_code(
            methods::SET_DISPLAY_WINDOW,
            &response,
            error_codes::INVALID_PARAMETERS,
        )?;

        // Blanking is the exception: it works ahead of a connection so
        // pipelines can pre-mute their sink.
        ctx.step("blankVideo while idle");
        ctx.check_call_success_with_update(
            methods::BLANK_VIDEO,
            BlankVideoRequest::new(sink, true).to_params()?,
            json!({"video": [{"sink": sink.as_str(), "muted": true}]}),
        )
        .await?;
        ctx.check_call_success_with_update(
            methods::BLANK_VIDEO,
            BlankVideoRequest::new(sink, false).to_params()?,
            json!({"video": [{"sink": sink.as_str(), "muted": false}]}),
        )
        .await?;
        Ok(())
    }
}

/// Scale limits and malformed windows are refused with specific codes
pub struct DisplayWindowScaleLimits;

#[async_trait]
impl Scenario for DisplayWindowScaleLimits {
    fn name(&self) -> &str {
        "display_window_scale_limits"
    }

    fn summary(&self) -> &str {
        "oversized, undersized and empty windows fail with their own codes"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let sink = primary_sink(ctx);
        connect(ctx, sink, config.source, config.source_port).await?;

        if config.support_negative_position {
            ctx.step("upscale beyond the panel");
            let response = ctx
                .check_call_fail_no_update(
                    methods::SET_DISPLAY_WINDOW,
                    windowed_request(ctx, sink, VideoRect::new(0, 0, 4000, 2250)).to_params()?,
                )
                .await?;
            expect_error_code(
                methods::SET_DISPLAY_WINDOW,
                &response,
                error_codes::UPSCALE_LIMIT,
            )?;
        } else {
            // Builds without negative-position support refuse anything that
            // leaves the panel before the scale checks run.
            ctx.step("window off the panel edge");
            let response = ctx
                .check_call_fail_no_update(
                    methods::SET_DISPLAY_WINDOW,
                    windowed_request(ctx, sink, VideoRect::new(-200, 0, 1920, 1080)).to_params()?,
                )
                .await?;
            expect_error_code(
                methods::SET_DISPLAY_WINDOW,
                &response,
                error_codes::INVALID_PARAMETERS,
            )?;
        }

        ctx.step("downscale below the floor");
        let response = ctx
            .check_call_fail_no_update(
                methods::SET_DISPLAY_WINDOW,
                windowed_request(ctx, sink, VideoRect::new(0, 0, 100, 50)).to_params()?,
            )
            .await?;
        expect_error_code(
            methods::SET_DISPLAY_WINDOW,
            &response,
            error_codes::DOWNSCALE_LIMIT,
        )?;

        ctx.step("windowed with no displayOutput");
        let response = ctx
            .check_call_fail_no_update(
                methods::SET_DISPLAY_WINDOW,
                json!({"sink": sink.as_str(), "fullScreen": false}),
            )
            .await?;
        expect_error_code(
            methods::SET_DISPLAY_WINDOW,
            &response,
            error_codes::INVALID_PARAMETERS,
        )?;
        Ok(())
    }
}

/// Schema validation refuses unknown scan types
pub struct VideoDataRejectsBadScanType;

#[async_trait]
impl Scenario for VideoDataRejectsBadScanType {
    fn name(&self) -> &str {
        "video_data_rejects_bad_scan_type"
    }

    fn summary(&self) -> &str {
        "setVideoData with an unknown scanType fails schema validation"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let sink = primary_sink(ctx);
        connect(ctx, sink, config.source, config.source_port).await?;

        ctx.step("setVideoData with bad scanType");
        let response = ctx
            .check_call_fail_no_update(
                methods::SET_VIDEO_DATA,
                json!({
                    "sink": sink.as_str(),
                    "contentType": "media",
                    "frameRate": 29.5,
                    "width": 1920,
                    "height": 1080,
                    "scanType": "sideways",
                }),
            )
            .await?;
        expect_error_code(
            methods::SET_VIDEO_DATA,
            &response,
            error_codes::SCHEMA_VALIDATION,
        )?;
        Ok(())
    }
}
