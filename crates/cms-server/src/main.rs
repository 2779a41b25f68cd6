use cms_server::{CmsServer, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Config path from the first argument, CMS_CONFIG, or the default file.
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CMS_CONFIG").ok())
        .unwrap_or_else(|| "cms.toml".to_string());

    let config = Config::load(&path)?;
    CmsServer::new(config).serve().await?;
    Ok(())
}
