//! Walk through a create / edit / save cycle
//!
//! Runs against the in-memory repository unless `CATALOG_API_URL` is set, in
//! which case the REST API is used.
//!
//! ```text
//! cargo run -p catalog-editor --example edit_product
//! ```

use anyhow::Context;
use catalog_editor::logger::init_logger_with_level;
use catalog_editor::{
    EditSession, EditorConfig, InMemoryRepository, ProductCache, ProductField, ProductRepository,
    SelectedFile, SizeField, SubmitOutcome,
};
use shared::AppError;
use std::sync::Arc;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EditorConfig::load();
    init_logger_with_level(Some(&config.log_level), false);

    let repository: Arc<dyn ProductRepository> = if std::env::var("CATALOG_API_URL").is_ok() {
        Arc::new(config.http_client().context("building REST client")?)
    } else {
        Arc::new(InMemoryRepository::new())
    };
    let session = EditSession::new(repository, Arc::new(config.decoder()), ProductCache::new());

    let mut events = session.cache().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(?event, "Refetch dependent views");
        }
    });

    session.begin_create()?;
    for field in [
        ProductField::Name("Linen Overshirt".into()),
        ProductField::Type("shirt".into()),
        ProductField::parse_price("64.00")?,
        ProductField::Producer("Atelier Nord".into()),
        ProductField::Description("Relaxed fit overshirt".into()),
        ProductField::Material("linen".into()),
    ] {
        session.set_field(field)?;
    }

    // No images yet: refused with the first failing rule
    session.set_variant_color(0, "sage")?;
    if let Err(e) = session.submit().await {
        let app: AppError = e.into();
        tracing::info!(code = %app.code, message = %app.message, "Submit refused");
    }

    session.update_size(0, 0, SizeField::Label("M".into()))?;
    session.update_size(0, 0, SizeField::parse_stock("12")?)?;
    session.add_variant()?;
    session.set_variant_color(1, "sand")?;
    session.update_size(1, 0, SizeField::Label("L".into()))?;

    let added = session
        .add_images(&[
            SelectedFile::from_bytes("front.png", PNG),
            SelectedFile::from_bytes("back.png", PNG),
        ])
        .await?;
    tracing::info!(accepted = added.accepted, "Images attached");

    let SubmitOutcome::Saved(product) = session.submit().await? else {
        anyhow::bail!("save was already in flight");
    };
    println!("{}", serde_json::to_string_pretty(&product)?);

    // Edit again: drop a variant and an image, then save
    session.begin_edit()?;
    session.remove_variant(1)?;
    session.remove_image(0)?;
    if let SubmitOutcome::Saved(product) = session.submit().await? {
        println!("{}", serde_json::to_string_pretty(&product)?);
    }

    Ok(())
}
