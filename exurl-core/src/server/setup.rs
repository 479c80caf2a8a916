use crate::config::ExurlConfig;
use crate::proxy::ExurlGateway;
use crate::server::runtime::build_runtime_state;
use anyhow::{Error, Result};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;
use std::sync::Arc;

/// Run the Pingora server with the given configuration.
pub fn run(config: ExurlConfig) -> Result<()> {
    let server = build_pingora_server(config)?;

    tracing::info!("exurl started");
    server.run_forever();
}

/// Build the Pingora server.
pub fn build_pingora_server(config: ExurlConfig) -> Result<Server, Error> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(
            threads,
            "Creating Pingora server with overridden worker threads"
        );
        let mut conf = ServerConf::new()
            .ok_or_else(|| anyhow::anyhow!("could not construct pingora server configuration"))?;
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" is required here to truly tell Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    let state = Arc::new(build_runtime_state(&config)?);
    let gateway = ExurlGateway::new(state);

    let mut svc = http_proxy_service(&server.configuration, gateway);
    if let Some(tls) = &config.server.tls {
        svc.add_tls(&config.server.listen, &tls.cert, &tls.key)?;
    } else {
        svc.add_tcp(&config.server.listen);
    }
    tracing::info!(listen = %config.server.listen, tls = config.server.tls.is_some(), "listener configured");

    server.add_service(svc);

    Ok(server)
}
