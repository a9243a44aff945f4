//! Shared setup for the http level tests.

use actix_web::web::Data;

use catalog_sv::db::{self, DbConnectionPool};

/// A single-connection pool over a fresh in-memory database. One
/// connection keeps every request on the same `:memory:` database.
pub fn memory_pool() -> Data<DbConnectionPool> {
    let _ = env_logger::builder().is_test(true).try_init();

    let pool = db::create_pool(":memory:", 1).expect("in-memory pool");
    db::run_migrations(&pool).expect("migrations");
    Data::new(pool)
}
