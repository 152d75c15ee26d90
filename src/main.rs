//! Microgrid simulator entry point: CLI wiring and service construction.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};

use microgrid_sim::cli::{Args, Command, SimulateArgs};
use microgrid_sim::config::AppConfig;
use microgrid_sim::io::export::Format;
use microgrid_sim::sim::{SimulationInput, Simulator};
use microgrid_sim::telemetry;
use microgrid_sim::weather::OpenMeteo;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    telemetry::init_tracing(args.json_logs);

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "ignoring .env");
        }
    }

    let config = load_config(&args)?;

    match args.command {
        Command::Serve(serve_args) => {
            let mut config = config;
            if let Some(host) = serve_args.host {
                config.server.host = host;
            }
            if let Some(port) = serve_args.port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Simulate(sim_args) => simulate_once(&config, sim_args).await,
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let config = match &args.config {
        Some(path) => {
            let config = AppConfig::from_toml_file(path)?;
            info!(path = %path.display(), "loaded configuration");
            config
        }
        None => AppConfig::default(),
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            warn!(%e, "invalid configuration");
        }
        bail!("configuration has {} error(s)", errors.len());
    }
    Ok(config)
}

fn build_simulator(config: &AppConfig, seed: Option<u64>) -> Result<Simulator> {
    let provider = OpenMeteo::new(
        &config.weather.base_url,
        &config.site.timezone,
        Duration::from_secs(config.weather.timeout_secs),
    )
    .context("building weather client")?;

    Ok(Simulator::new(
        Arc::new(provider),
        config.simulation.panel_capacity_kw,
        config.site.location(),
        seed.or(config.simulation.seed),
    ))
}

#[cfg(feature = "api")]
async fn serve(config: AppConfig) -> Result<()> {
    use microgrid_sim::agent::Agent;
    use microgrid_sim::api::{self, AppState};

    let addr = config.server.socket_addr()?;
    let simulator = build_simulator(&config, None)?;
    let agent = Agent::from_config(&config.agent).context("building language model client")?;
    let clock = config.site.clock()?;

    let state = Arc::new(AppState::new(simulator, agent, clock));
    api::serve(state, addr)
        .await
        .with_context(|| format!("serving on {addr}"))
}

#[cfg(not(feature = "api"))]
async fn serve(_config: AppConfig) -> Result<()> {
    bail!("built without the `api` feature; rebuild with `--features api` to serve")
}

async fn simulate_once(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let simulator = build_simulator(config, args.seed)?;
    let now = match args.at {
        Some(at) => at,
        None => config.site.clock()?.now().time(),
    };

    let input = SimulationInput::new(args.weather, args.homes, args.battery_cap, now);
    let result = simulator.run(&input).await;

    let body = Format::from(args.format).render(&result)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    if !body.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
