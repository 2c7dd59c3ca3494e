use clap::Parser;
use climate_analyzer::app;
use climate_analyzer::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    app::run(config).await
}
