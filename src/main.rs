use clap::Parser;
use timetable_engine::config::Cli;
use timetable_engine::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let store = cli.initial_store()?;
    server::run_server(cli.bind, store).await?;

    Ok(())
}
