use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::PgConnection;

use crate::config::AppConfig;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn create_conn(config: &AppConfig) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    Pool::builder().build(manager)
}
