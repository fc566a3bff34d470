mod app;
mod capture;
mod editor;
mod selection;
mod ui;

use libadwaita as adw;

use adw::prelude::*;
use log::info;

const APP_ID: &str = "org.example.Snipper";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting {}", APP_ID);

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(ui::build_ui);
    app.run();
}
