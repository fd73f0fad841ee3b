//! quake-glance: a terminal dashboard over a seismic event dataset.

use std::process::ExitCode;

use quake_glance::app::Dashboard;
use quake_glance::catalog::{Catalog, SqlDialect};
use quake_glance::cli::Cli;
use quake_glance::config::{Config, ConnectionConfig};
use quake_glance::db::DatabaseBackend;
use quake_glance::error::{GlanceError, Result};
use quake_glance::output::HeadlessOutput;
use quake_glance::{logging, tui};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads env-backed flags.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    cli.validate_headless().map_err(GlanceError::config)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let mut dataset = config.dataset.clone();
    cli.apply_dataset_overrides(&mut dataset);

    let connection = resolve_connection(&cli, &config)?;

    // The menu can be listed without a database.
    if cli.list && cli.query.is_none() && !cli.total && connection.is_none() {
        let format = cli.parse_output_format().map_err(GlanceError::config)?;
        let catalog = Catalog::standard(&dataset, SqlDialect::new(DatabaseBackend::default()))?;
        print!("{}", HeadlessOutput::new(format).format_labels(&catalog.list_labels()));
        return Ok(ExitCode::SUCCESS);
    }

    let dashboard = Dashboard::connect(connection, &dataset)?;
    info!("Connection: {}", dashboard.connection_info());

    let result = if cli.is_headless() {
        run_headless(&cli, &dashboard).await
    } else {
        tui::run(&dashboard).await.map(|()| ExitCode::SUCCESS)
    };

    if let Err(e) = dashboard.close().await {
        warn!("Error closing database connection: {}", e);
    }

    result
}

/// Prints the requested results to stdout. A failed query yields a failing
/// exit code after its error has been printed.
async fn run_headless(cli: &Cli, dashboard: &Dashboard) -> Result<ExitCode> {
    let format = cli.parse_output_format().map_err(GlanceError::config)?;
    let output = HeadlessOutput::new(format);
    let mut code = ExitCode::SUCCESS;

    if cli.list {
        print!("{}", output.format_labels(&dashboard.labels()));
    }

    if cli.total {
        let total = dashboard.total_count().await?;
        print!("{}", output.format_total(total));
    }

    if let Some(selector) = &cli.query {
        let definition = dashboard.catalog().resolve(selector)?;
        let instruction = dashboard.run_definition(definition).await;
        print!("{}", output.format_instruction(definition.label(), &instruction));
        if instruction.is_error() {
            code = ExitCode::FAILURE;
        }
    }

    Ok(code)
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// Precedence: positional URL, then `--connection <name>`, then the config's
/// `default` connection, then `DATABASE_URL`, then `PG*` variables.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<Option<ConnectionConfig>> {
    let mut connection = cli.to_connection_config()?;

    if connection.is_none() {
        if let Some(name) = cli.connection_name() {
            connection = config.get_connection(Some(name)).cloned();
            if connection.is_none() {
                return Err(GlanceError::config(format!(
                    "Connection '{}' not found in config file",
                    name
                )));
            }
        }
    }

    if connection.is_none() {
        connection = config.get_connection(None).cloned();
    }

    if connection.is_none() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            connection = Some(ConnectionConfig::from_connection_string(&url)?);
        }
    }

    if connection.is_none()
        && (std::env::var_os("PGHOST").is_some() || std::env::var_os("PGDATABASE").is_some())
    {
        connection = Some(ConnectionConfig::default());
    }

    if let Some(ref mut conn) = connection {
        conn.apply_env_defaults();
    }

    Ok(connection)
}
