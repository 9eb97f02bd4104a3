mod app;
mod audio;
mod config;
mod dataset;
mod player;
mod resource;
mod route;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
