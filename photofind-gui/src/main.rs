//! PhotoFind desktop app

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

mod app;

use anyhow::Result;
use eframe::{egui, NativeOptions};
use photofind_core::{Conf, UnsplashClient};

use crate::app::PhotoFindApp;

fn main() -> Result<()> {
    init_logging();

    let conf = Conf::new()?;
    if conf.api_key.is_none() {
        log::warn!("No API key configured; every request will fail");
    }
    log::info!("Using {} with key {}", conf.base_url, conf.masked_api_key());
    let client = UnsplashClient::new(&conf);

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("PhotoFind"),
        ..Default::default()
    };

    eframe::run_native(
        "PhotoFind",
        native_options,
        Box::new(|cc| Ok(Box::new(PhotoFindApp::new(cc, client)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run PhotoFind: {}", e))
}

fn init_logging() {
    let mut filters = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_owned()
        } else {
            "info".to_owned()
        }
    });
    // Keep the TLS and GL layers quiet unless asked for explicitly.
    for loud_crate in ["rustls", "egui_glow", "eframe"] {
        if !filters.contains(&format!("{loud_crate}=")) {
            filters += &format!(",{loud_crate}=warn");
        }
    }

    env_logger::Builder::new().parse_filters(&filters).init(); // Log to stderr (if you run with `RUST_LOG=debug`).
}
