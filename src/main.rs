//! storyrelay HTTP server
//!
//! Starts an Axum web server exposing the title and story generation endpoints.

use clap::Parser;
use storyrelay::{
    cli::{Cli, Command, generate_env_template},
    config::Config,
    handlers::{self, AppState},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Env { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_env_template())?;
                println!("Wrote environment template to {}", path);
            }
            None => print!("{}", generate_env_template()),
        }
        return Ok(());
    }

    let config = Config::from_env_file(&cli.env_file)?;

    telemetry::init(&config.observability.log_level);

    // Missing credential is fatal here, not on the first request
    config.validate()?;

    tracing::info!(
        base_url = %config.llm.base_url(),
        "Starting storyrelay server on {}:{}",
        config.server.host,
        config.server.port
    );

    let listener = config.server.bind().await?;
    let addr = listener.local_addr()?;
    let state = AppState::new(&config)?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Endpoints: /get_titles, /get_stories, /health, /metrics");

    axum::serve(listener, app).await?;

    Ok(())
}
