use std::io;

use actix_web::{App, HttpServer, middleware};
use actix_web::web::Data;
use log::info;

use catalog_sv::api;
use catalog_sv::config::Settings;
use catalog_sv::core::error::Error;
use catalog_sv::db;

fn startup_error(e: Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG",
      format!("{}actix_web=debug", std::env::var("RUST_LOG")
          .map_or_else(|_| "".to_string(), |ll| format!("{},", ll))
      ));
    env_logger::init();

    let settings = Settings::from_env().map_err(startup_error)?;

    let pool = db::create_pool(&settings.database_url, settings.pool_size)
        .map_err(startup_error)?;
    let applied = db::run_migrations(&pool).map_err(startup_error)?;
    info!("database ready at {} ({} migrations applied)", settings.database_url, applied);

    let pool = Data::new(pool);

    info!("Starting server at: {}", &settings.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(&settings.bind_addr)?
    .run()
    .await
}
