use crate::{
    config::{Config, StoreKind},
    contact::{ContactStore, MemoryContacts, MongoContacts},
};
use mongodb::{options::ClientOptions, Client, Database};
use std::sync::Arc;

/// Returns a mongo client according to the configured mongo URL
pub async fn get_mongo_client(mongo_url: &str) -> Result<Client, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(mongo_url).await?;
    client_options
        .app_name
        .get_or_insert_with(|| "contact-app".to_string());

    Client::with_options(client_options)
}

/// Returns the configured mongo database from get_mongo_client()
pub async fn get_mongo_database(config: &Config) -> Result<Database, mongodb::error::Error> {
    let client = get_mongo_client(&config.mongo_url).await?;

    Ok(client.database(&config.mongo_database))
}

/// Opens whichever contact store the config asks for.
///
/// For mongo this also pings the server, so a bad `MONGO_URL` is reported at startup
/// rather than on the first request.
pub async fn open_store(config: &Config) -> Result<Arc<dyn ContactStore>, mongodb::error::Error> {
    Ok(match config.store {
        StoreKind::Memory => {
            log::warn!("keeping contacts in memory; they'll be gone when the server stops");
            Arc::new(MemoryContacts::default())
        }
        StoreKind::Mongo => {
            let db = get_mongo_database(config).await?;
            db.run_command(bson::doc! { "ping": 1 }, None).await?;
            log::info!("connected to mongo database {}", db.name());
            Arc::new(MongoContacts::new(&db))
        }
    })
}
