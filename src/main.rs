use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

use email_scraper_lib::job_manager::JobManager;
use email_scraper_lib::scraper::PlatformScraperFactory;
use email_scraper_lib::server::{self, AppState};
use email_scraper_lib::{config, logger};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    logger::init();

    let factory = Arc::new(PlatformScraperFactory::new(
        config::BASE_URL,
        &config::webdriver_url(),
    ));
    let job_manager = Arc::new(JobManager::new(factory, config::max_concurrent_jobs()));
    let state = web::Data::new(AppState { job_manager });

    let port = config::port();
    log::info!("Starting web server at http://0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(server::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
