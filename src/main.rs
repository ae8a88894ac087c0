//! Review comment fetcher HTTP service entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use comments_fetcher::{ServeError, ServiceConfig, serve};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServeError> {
    let config = ServiceConfig::load_layers()?;
    let settings = config.validate()?;
    serve(&settings).await
}

/// Installs the global subscriber, honouring `RUST_LOG` and defaulting to
/// `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
