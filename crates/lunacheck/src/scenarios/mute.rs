//! Blanking scenario

use super::{connect, mute};
use async_trait::async_trait;
use lunacheck_harness::{Result, Scenario, ScenarioContext};

/// Blanking follows the call on every configured sink
pub struct Mute;

#[async_trait]
impl Scenario for Mute {
    fn name(&self) -> &str {
        "mute"
    }

    fn summary(&self) -> &str {
        "blankVideo false/true is reflected in the muted status flag"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        for sink in config.sinks {
            connect(ctx, sink, config.source, config.source_port).await?;
            for blank in [false, true] {
                mute(ctx, sink, blank).await?;
            }
        }
        Ok(())
    }
}
