use eframe::egui;
use housing_lens::app::HousingLensApp;
use housing_lens::config::AppConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env()?;
    log::info!("Starting with {config:?}");
    let title = config.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(HousingLensApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
