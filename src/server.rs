//! HTTP server assembly: contact relay, onboarding API and health probe.

use std::future::Future;
use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::config::SiteConfig;
use crate::contact::{ContactRouteState, SmtpMailer, contact_routes};
use crate::error::Result;
use crate::onboarding::{OnboardingManager, OnboardingRouteState, onboarding_routes, spawn_expiry_task};
use crate::storage::{AssetSigner, S3Storage};

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mascotte-site"
    }))
}

/// Combine the route groups into one application router.
pub fn app(onboarding: OnboardingRouteState, contact: ContactRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(onboarding_routes(onboarding))
        .merge(contact_routes(contact))
        .layer(CorsLayer::permissive())
}

/// Build the application router with the real SMTP mailer and S3 signer.
pub fn router_from_config(config: &SiteConfig) -> Router {
    app(
        OnboardingRouteState {
            manager: OnboardingManager::new(config.onboarding.clone()),
        },
        contact_state(config),
    )
}

fn contact_state(config: &SiteConfig) -> ContactRouteState {
    let signer = config
        .storage
        .clone()
        .map(|storage| Arc::new(S3Storage::new(storage)) as Arc<dyn AssetSigner>);

    ContactRouteState {
        mailer: Arc::new(SmtpMailer::new(config.mail.clone(), config.company_name.clone())),
        signer,
        company_name: config.company_name.clone(),
        logo_name: config.logo_name.clone(),
    }
}

/// Bind the configured port and serve until `shutdown` resolves.
pub async fn serve<F>(config: &SiteConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let manager = OnboardingManager::new(config.onboarding.clone());
    let sweeper = spawn_expiry_task(Arc::clone(&manager));
    let router = app(OnboardingRouteState { manager }, contact_state(config));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Site server started");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;
    sweeper.abort();
    served?;
    Ok(())
}
