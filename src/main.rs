#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use std::path::PathBuf;

use rust_todo_app::io::{FileStore, KeyValueStore, MemoryStore};
use rust_todo_app::{logging, Session, Settings};

/// Open file-backed storage, or fall back to memory so the app still starts.
fn open_store(settings: &Settings) -> (Box<dyn KeyValueStore>, Option<PathBuf>) {
    match settings.data_dir().and_then(FileStore::open) {
        Ok(store) => {
            let dir = store.dir().to_path_buf();
            log::info!("event=storage_open module=main status=ok data_dir={}", dir.display());
            (Box::new(store), Some(dir))
        }
        Err(err) => {
            log::error!("event=storage_open module=main status=fallback_memory error={err}");
            (Box::new(MemoryStore::new()), None)
        }
    }
}

fn main() -> eframe::Result<()> {
    let settings = Settings::load();

    match settings.log_dir() {
        Ok(dir) => {
            if let Err(err) = logging::init_logging(&settings.log_level, &dir) {
                eprintln!("logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let (store, data_dir) = open_store(&settings);
    let session = Session::open(store);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Rust Todo App"),
        ..Default::default()
    };

    eframe::run_native(
        "Rust Todo App",
        options,
        Box::new(move |cc| Ok(Box::new(app::TodoApp::new(cc, session, data_dir)))),
    )
}
