use actix_web::HttpServer;
use contact_app::{data, session::SigningKey, AppState, Config, Views};

#[actix_rt::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let config = Config::from_env()?;

    let signing_key = match config.session_secret.as_deref() {
        Some(secret) => SigningKey::new(secret.as_bytes())?,
        None => {
            log::warn!("SESSION_SECRET isn't set; sessions won't survive a restart");
            SigningKey::generate()
        }
    };

    let contacts = data::open_store(&config).await?;
    let state = AppState::new(contacts, Views::new()?, signing_key, config.session_idle);

    let addr = (config.bind_address.as_str(), config.port);
    log::info!("Mongo Contact App | Listening at {}:{}", addr.0, addr.1);

    HttpServer::new(move || contact_app::app(&state))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
