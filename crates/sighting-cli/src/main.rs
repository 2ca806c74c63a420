mod commands;
mod logging;
mod metadata;
mod settings;

use settings::Settings;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    logging::setup_logging();
    metadata::log_version_info();

    let settings = Settings::from_cli();
    if let Err(err) = commands::run(settings.command).await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}
