//! Connect/disconnect scenarios

use super::{connect, disconnect};
use async_trait::async_trait;
use lunacheck_harness::{Result, Scenario, ScenarioContext};
use lunacheck_protocol::methods;
use lunacheck_protocol::request::{ConnectRequest, ToParams};
use lunacheck_protocol::{Sink, Source};
use serde_json::json;

/// Every source/port combination connects and disconnects cleanly,
/// repeatedly
pub struct ConnectDisconnect;

#[async_trait]
impl Scenario for ConnectDisconnect {
    fn name(&self) -> &str {
        "connect_disconnect"
    }

    fn summary(&self) -> &str {
        "cycle every source and port through connect/disconnect three times"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let matrix: [(Source, &[u8]); 2] = [(Source::Vdec, &[0, 1]), (Source::Hdmi, &[0, 1, 2])];
        for (source, ports) in matrix {
            for &port in ports {
                for sink in ctx.config().sinks.clone() {
                    for _ in 0..3 {
                        connect(ctx, sink, source, port).await?;
                        disconnect(ctx, sink).await?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Both sinks hold their connections at the same time
pub struct DualConnect;

#[async_trait]
impl Scenario for DualConnect {
    fn name(&self) -> &str {
        "dual_connect"
    }

    fn summary(&self) -> &str {
        "connect MAIN and SUB0 together; one status event carries both rows"
    }

    async fn run(&self, ctx: &ScenarioContext) -> Result<()> {
        let config = ctx.config().clone();
        let source = config.source;
        let port = config.source_port;
        let dual = config.sinks.contains(&Sink::Sub0);

        connect(ctx, Sink::Main, source, port).await?;

        if dual {
            // The second connect's status event must still carry MAIN's row.
            let mut request = ConnectRequest::new(Sink::Sub0, source, port);
            if let Some(context) = config.call_context() {
                request = request.with_context(context);
            }
            ctx.check_call_success_with_update(
                methods::CONNECT,
                request.to_params()?,
                json!({"video": [
                    {"sink": "MAIN", "connectedSource": source.as_str(), "connectedSourcePort": port},
                    {"sink": "SUB0", "connectedSource": source.as_str(), "connectedSourcePort": port},
                ]}),
            )
            .await?;
        }

        disconnect(ctx, Sink::Main).await?;
        if dual {
            disconnect(ctx, Sink::Sub0).await?;
        }
        Ok(())
    }
}
