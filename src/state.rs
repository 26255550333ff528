use crate::database::Database;

/// Shared application state carried through axum
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}
