mod app;
mod config;
mod engine;
mod error;
mod mpris;
mod playlist;
mod runtime;
mod time_display;
mod transport;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
