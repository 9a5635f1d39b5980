mod app;
mod audio;
mod config;
mod library;
mod playback;
mod runtime;
mod theme;
mod ui;

fn main() {
    if let Err(e) = runtime::run() {
        eprintln!("musicova: {e}");
        std::process::exit(1);
    }
}
