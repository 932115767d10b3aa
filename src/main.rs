//! solar-quote entry point: CLI wiring and config-driven quote construction.

use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use solar_quote::cli::{self, CliOptions, Command};
use solar_quote::config::QuoteConfig;
use solar_quote::error::QuoteError;
use solar_quote::io::export::export_csv;
use solar_quote::quote::Quote;

fn load_config(cli: &CliOptions) -> Result<QuoteConfig, QuoteError> {
    // --config takes priority, then --preset, then the default tables
    let config = if let Some(ref path) = cli.config {
        QuoteConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        QuoteConfig::from_preset(name)?
    } else {
        QuoteConfig::default()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(QuoteError::InvalidConfig(errors));
    }
    Ok(config)
}

fn run(cli: CliOptions) -> Result<(), QuoteError> {
    let config = load_config(&cli)?;

    if cli.serve {
        return serve(config, cli.port);
    }

    let quote = Quote::compute(&config, &cli.inputs)?;
    println!("{quote}");

    if let Some(ref path) = cli.csv_out {
        export_csv(&quote, path)?;
        info!(path = %path.display(), "quote written");
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(config: QuoteConfig, port: u16) -> Result<(), QuoteError> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(solar_quote::api::AppState { config });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(solar_quote::api::serve(state, addr))?;
    Ok(())
}

#[cfg(not(feature = "api"))]
fn serve(_config: QuoteConfig, _port: u16) -> Result<(), QuoteError> {
    tracing::error!("--serve requires building with `--features api`");
    process::exit(2);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solar_quote=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(opts) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
