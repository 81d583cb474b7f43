//! totp-mcp - TOTP codes for a fixed set of accounts, served over MCP stdio.

use std::io;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use totp_mcp::accounts::AccountRegistry;
use totp_mcp::config::Config;
use totp_mcp::dispatcher::ToolDispatcher;
use totp_mcp::mcp::McpServer;
use totp_mcp::secrets::SecretsFile;

fn main() {
    let config = Config::from_env();

    // stdout carries the protocol, so diagnostics go to stderr
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new("totp_mcp=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let dispatcher = ToolDispatcher::new(
        AccountRegistry::default(),
        SecretsFile::new(&config.secrets_file),
    );
    let server = McpServer::new(dispatcher);

    info!(secrets_file = %config.secrets_file.display(), "TOTP MCP server running");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    if let Err(e) = server.run(stdin, stdout) {
        error!("MCP server stopped: {e}");
        std::process::exit(1);
    }
}
