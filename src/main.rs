mod app;

use std::process::ExitCode;

use toroidal_life::config::RunConfig;

use crate::app::App;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to set up grid: {}", e);
            return ExitCode::FAILURE;
        }
    };

    app.run();
    print!("{}", app.engine().dump());
    ExitCode::SUCCESS
}
