use anyhow::Context;

use mascotte::config::SiteConfig;
use mascotte::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        anyhow::bail!("Failed to install rustls crypto provider");
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = SiteConfig::from_env().context("invalid configuration")?;

    eprintln!("Mascotte site v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Company: {}", config.company_name);
    eprintln!("   API: http://0.0.0.0:{}/api/sendRequest", config.port);
    eprintln!("   Onboarding: http://0.0.0.0:{}/api/onboarding", config.port);
    eprintln!(
        "   Mail: {}",
        match &config.mail.smtp_host {
            Some(host) => format!("{host}:{} -> {}", config.mail.smtp_port, config.mail.recipient),
            None => "disabled (SMTP_HOST not set)".to_string(),
        }
    );
    eprintln!(
        "   Storage: {}",
        match &config.storage {
            Some(storage) => format!("{} ({})", storage.bucket, storage.region),
            None => "disabled (AWS_REGION not set)".to_string(),
        }
    );
    eprintln!("   Practice countdown: {}s", config.onboarding.practice_seconds);
    eprintln!(
        "   Idle session timeout: {}s\n",
        config.onboarding.idle_timeout.as_secs()
    );

    server::serve(&config, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down");
    })
    .await
    .with_context(|| format!("server on port {} failed", config.port))?;

    Ok(())
}
