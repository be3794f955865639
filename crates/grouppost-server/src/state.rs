use grouppost_core::app::App;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub app: App,
}

impl AppState {
    pub fn new(app: App) -> SharedState {
        Arc::new(Self { app })
    }
}
