mod config;
mod logging;
mod ui;

use std::process::ExitCode;

use config::AppConfig;
use gifstudio_adapters::{BackgroundProcessingGateway, BackgroundSourceInspector, FsArtifactStore};
use gifstudio_application::{ApplicationError, StudioService};

fn main() -> ExitCode {
    logging::init_logging();
    let config = AppConfig::default();

    let service = match build_service(&config) {
        Ok(service) => service,
        Err(error) => {
            eprintln!("failed to start gifstudio: {error}");
            return ExitCode::from(1);
        }
    };

    match ui::launch_window(service, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(1)
        }
    }
}

fn build_service(config: &AppConfig) -> Result<StudioService, ApplicationError> {
    Ok(StudioService::new(
        Box::new(BackgroundProcessingGateway::new(config.endpoint.clone())?),
        Box::new(BackgroundSourceInspector::new()),
        Box::new(FsArtifactStore::new(config.cache_dir.clone())),
    ))
}
