use anyhow::Result;
use common::gateway::GatewayClient;
use common::types::Address;
use reader::BatchReader;
use std::time::Duration;

mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let config = common::config::Config::load()?;
    let _otel_guard = common::observability::init("cli", &config.general.log_level)?;

    let cmd = commands::parse_args(std::env::args()).map_err(anyhow::Error::msg)?;

    let gateway = GatewayClient::new(
        &config.gateway.base_url,
        Duration::from_secs(config.gateway.request_timeout_secs),
    )?;
    let factory: Address = config.gateway.factory_address.parse()?;
    let reader = BatchReader::new(gateway, factory);

    tracing::debug!(factory = %factory, "running query");
    commands::run_command(&reader, &config.reader, cmd).await
}
