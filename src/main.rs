use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use taskboard::{
    config::Config,
    handlers::{AppState, configure_routes},
    metrics, store,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    log::info!(
        "Starting with store={} transitions={}",
        config.store.backend.as_str(),
        config.transition_policy.as_str()
    );

    metrics::init_metrics();

    // opened once and shared across all workers
    let store = store::open(&config).await.map_err(|e| {
        log::error!("Failed to open task store: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let bind = (config.bind_address.clone(), config.port);
    let app_data = AppState {
        store,
        config: Arc::new(config),
    };

    log::info!("starting HTTP server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_data.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
