//! Loads contacts from a CSV file into the configured store.
//! The file needs a header row naming the `nama`, `email` and `nohp` columns; other columns are ignored.
//! Rows go through the same checks as the add form, and rows that fail them are skipped.
use contact_app::contact::{import, ContactForm};
use contact_app::{data, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "contacts.csv".to_string());
    let config = Config::from_env()?;
    let contacts = data::open_store(&config).await?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|e| format!("invalid csv {}: {}", path, e))?;

    let summary = import::import_rows(rdr.deserialize::<ContactForm>(), &*contacts).await?;
    println!(
        "imported {} contacts from {}, skipped {}",
        summary.inserted, path, summary.skipped
    );

    Ok(())
}
