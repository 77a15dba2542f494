use crate::config::AppConfig;
use crate::security::jwt::TokenService;
use crate::shared::utils::DbPool;

/// Handles shared by every request handler. Constructed once in `main` and
/// passed down as `Arc<AppState>`; nothing here is globally mutable.
pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
    pub tokens: TokenService,
}
