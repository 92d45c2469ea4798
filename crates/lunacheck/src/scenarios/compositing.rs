//! Compositing scenario

use super::{connect, primary_sink};
use async_trait::async_trait;
use lunacheck_harness::{Result, Scenario, ScenarioContext};
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{
    ComposeOrder, CompositingRequest, DisplayWindowRequest, ToParams,
};
use lunacheck_protocol::Sink;
use serde_json::json;

/// Z-order and opacity land in status, and a later window call keeps them
pub struct SetCompositing;

#[async_trait]
impl Scenario for SetCompositing {
    fn name(&self) -> &str {
        "set_compositing"
    }

    fn summary(&self) -> &str {
        "setCompositing applies opacity and zOrder; setDisplayWindow updates opacity only"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let dual = config.sinks.contains(&Sink::Sub0);

        connect(ctx, primary_sink(ctx), config.source, config.source_port).await?;
        if dual {
            connect(ctx, Sink::Sub0, config.source, config.source_port).await?;
        }

        // The ordering always names both hardware sinks; SUB0 need not be
        // connected for its compositing slot to exist.
        ctx.step("setCompositing");
        ctx.check_call_success_with_update(
            methods::SET_COMPOSITING,
            CompositingRequest::new(vec![
                ComposeOrder::new(Sink::Main, 20, 1),
                ComposeOrder::new(Sink::Sub0, 31, 0),
            ])
            .to_params()?,
            json!({"video": [{"sink": "MAIN", "opacity": 20, "zOrder": 1}]}),
        )
        .await?;

        ctx.step("setDisplayWindow opacity 130");
        let mut request = DisplayWindowRequest::full_screen(Sink::Main).with_opacity(130);
        if let Some(context) = config.call_context() {
            request = request.with_context(context);
        }
        ctx.check_call_success_with_update(
            methods::SET_DISPLAY_WINDOW,
            request.to_params()?,
            json!({"video": [{"sink": "MAIN", "opacity": 130, "zOrder": 1}]}),
        )
        .await?;

        if dual {
            ctx.step("setDisplayWindow SUB0 opacity 200");
            let mut request = DisplayWindowRequest::full_screen(Sink::Sub0).with_opacity(200);
            if let Some(context) = config.call_context() {
                request = request.with_context(context);
            }
            ctx.check_call_success_with_update(
                methods::SET_DISPLAY_WINDOW,
                request.to_params()?,
                json!({"video": [{"sink": "SUB0", "opacity": 200, "zOrder": 0}]}),
            )
            .await?;
        }

        Ok(())
    }
}
