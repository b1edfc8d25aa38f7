use rollcall_kiosk::app::{self, AppConfig};

use env_logger::{Builder, Target};
use log::LevelFilter;

fn init_logger() {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("rollcall_kiosk", LevelFilter::Debug)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let config = AppConfig::from_environment()?;
    let runtime = app::runtime_boot(&config)?;

    app::check_backend(runtime.service.as_ref(), config.backend_url()).await;

    runtime.controller.start().await;
    app::console::run(runtime.controller).await
}
