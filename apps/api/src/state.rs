use crate::ats::service::AtsService;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Store and tip writer are chosen once in `main` and injected here.
    pub ats: AtsService,
    pub config: Config,
}
