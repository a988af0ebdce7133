use std::sync::Arc;

use sqlx::SqlitePool;

use crate::gateway::DataGateway;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub gateway: Arc<dyn DataGateway>,
}
