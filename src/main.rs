//! Release cadence statistics for GitHub projects.

use release_pulse::commands;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Batch jobs fail loudly; the API layer has its own error mapping.
    if let Err(e) = commands::run(std::env::args_os()).await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
