use mock_server::MockConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut config = MockConfig {
        api_key: std::env::var("MOCK_API_KEY").ok().filter(|k| !k.is_empty()),
        ..MockConfig::default()
    };
    if let Some(limit) = std::env::var("MOCK_RATE_LIMIT").ok().and_then(|v| v.parse().ok()) {
        config.rate_limit = limit;
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener, config).await
}
