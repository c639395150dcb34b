use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use djbooking_backend::auth::TokenVerifier;
use djbooking_backend::cache::{QueryCache, RedisCache};
use djbooking_backend::config::AppConfig;
use djbooking_backend::create_pool;
use djbooking_backend::handlers;
use djbooking_backend::supabase::SupabaseClient;
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;
    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(|e| std::io::Error::other(format!("Migrations failed: {e}")))?;
        tracing::info!("Migrations applied");
    }

    let cache = match &config.redis_url {
        Some(url) => match RedisCache::new(url).await {
            Ok(redis) => {
                tracing::info!("Connected to Redis");
                QueryCache::new(Some(redis))
            }
            Err(e) => {
                tracing::warn!("Redis unavailable, query cache disabled: {e}");
                QueryCache::disabled()
            }
        },
        None => {
            tracing::info!("REDIS_URL not set, query cache disabled");
            QueryCache::disabled()
        }
    };

    if !config.privileged_backend_configured() {
        tracing::warn!("SUPABASE_SERVICE_ROLE_KEY not set: uploads and user deletion are disabled");
    }

    let supabase = web::Data::new(SupabaseClient::new(&config.supabase));
    let verifier = web::Data::new(TokenVerifier::from_config(&config.supabase));
    let db_data = web::Data::new(db);
    let cache_data = web::Data::new(cache);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let config_data = web::Data::new(config);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(supabase.clone())
            .app_data(verifier.clone())
            .app_data(cache_data.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(handlers::path_config())
            .app_data(web::PayloadConfig::new(handlers::MAX_UPLOAD_BYTES))
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
