//! Register flow scenario
//!
//! Gated behind `support_register`; most deployments connect with implicit
//! clients and never call register at all.

use async_trait::async_trait;
use lunacheck_harness::{HarnessError, Result, Scenario, ScenarioContext};
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{RegisterRequest, ToParams};

/// Contexts register once, unregister cleanly, and can come back
pub struct RegisterLifecycle;

#[async_trait]
impl Scenario for RegisterLifecycle {
    fn name(&self) -> &str {
        "register_lifecycle"
    }

    fn summary(&self) -> &str {
        "double registration fails; unregister and re-register succeed"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        if !ctx.config().support_register {
            return Err(HarnessError::skipped("register flow disabled in config"));
        }
        let Some(context) = ctx.config().primary_context().map(str::to_string) else {
            return Err(HarnessError::Config("no contexts configured".to_string()));
        };

        // The fixture registered this context already.
        ctx.step(format!("re-register {}", context));
        ctx.check_call_fail(
            methods::REGISTER,
            RegisterRequest::new(&context).to_params()?,
        )
        .await?;

        ctx.step(format!("unregister {}", context));
        ctx.check_call_success(
            methods::UNREGISTER,
            RegisterRequest::new(&context).to_params()?,
        )
        .await?;

        ctx.step(format!("register {}", context));
        ctx.check_call_success(
            methods::REGISTER,
            RegisterRequest::new(&context).to_params()?,
        )
        .await?;
        Ok(())
    }
}
