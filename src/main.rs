// Entrypoint for the FileShare terminal client.
// - Keeps `main` small: read configuration, set up logging, build the
//   executor and hand it to the UI loop.
// - Returns `anyhow::Result` so start-up failures print and exit non-zero.

use std::sync::Arc;

use fileshare_cli::{
    api::ApiClient,
    config::Config,
    credentials::CredentialStore,
    executor::{Executor, NativePicker},
    logging, ui,
};

fn main() -> anyhow::Result<()> {
    // `FILESHARE_*` environment variables, see `Config::from_env`.
    let config = Config::from_env()?;
    let _log_guard = logging::init(&config);
    tracing::info!(server = %config.server_url, "starting");

    let api = ApiClient::new(&config)?;
    let executor = Executor::new(
        Arc::new(api),
        Arc::new(NativePicker),
        CredentialStore::new(&config.credentials_path),
        &config.downloads_dir,
    );

    // Blocks until the user exits.
    ui::run(&executor)?;
    Ok(())
}
