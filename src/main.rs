use actix_web::HttpServer;
use paperclip::actix::web;
use tracer_api::{AuthConfig, ServerConfig, Storage, create_app};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let server_config = ServerConfig::from_env();
    let auth_config = AuthConfig::from_env();

    let storage = match Storage::open(&server_config.database_path) {
        Ok(storage) => web::Data::new(storage),
        Err(err) => {
            error!(
                path = %server_config.database_path.display(),
                error = %err,
                "failed to open database"
            );
            std::process::exit(1);
        }
    };

    info!(addr = %server_config.bind_addr, "server starting");

    HttpServer::new(move || create_app(storage.clone(), auth_config.clone()))
        .bind(&server_config.bind_addr)?
        .run()
        .await
}
