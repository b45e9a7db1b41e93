use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::http::{self, AppState};
use crate::logging;
use std::net::{IpAddr, SocketAddr};

/// Handle the `serve` command: open the stores and run the HTTP API until Ctrl-C.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { host, port } = cmd {
        logging::init("info,tower_http=debug");

        let host = host.clone().unwrap_or_else(|| cfg.host.clone());
        let ip: IpAddr = host
            .parse()
            .map_err(|_| AppError::Config(format!("invalid host address: {host}")))?;
        let addr = SocketAddr::new(ip, port.unwrap_or(cfg.port));

        let state = AppState::from_config(cfg)?;
        tracing::info!(
            database = %cfg.database,
            accounts = %cfg.accounts_path().display(),
            readings = %cfg.readings_path().display(),
            capacity = state.readings.capacity(),
            "stores opened"
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(http::serve(state, addr))?;
    }

    Ok(())
}
