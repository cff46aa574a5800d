//! Integration tests for the site HTTP API.
//!
//! Each test spins up an Axum server on a random port and exercises the
//! onboarding and contact endpoints over real HTTP with reqwest.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use mascotte::config::OnboardingConfig;
use mascotte::contact::{ContactRouteState, Mailer, OutgoingEmail};
use mascotte::error::MailError;
use mascotte::onboarding::{OnboardingManager, OnboardingRouteState};
use mascotte::server::app;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Mailer that records instead of sending.
#[derive(Default)]
struct StubMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    mailer: Arc<StubMailer>,
}

/// Start an Axum server on a random port with a short practice countdown.
async fn start_server(practice_seconds: u32, tick_period: Duration) -> TestServer {
    let mailer = Arc::new(StubMailer::default());
    let router = app(
        OnboardingRouteState {
            manager: OnboardingManager::new(OnboardingConfig {
                practice_seconds,
                tick_period,
                ..OnboardingConfig::default()
            }),
        },
        ContactRouteState {
            mailer: Arc::clone(&mailer) as Arc<dyn Mailer>,
            signer: None,
            company_name: "Mascotte.AI".into(),
            logo_name: None,
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        base: format!("http://127.0.0.1:{port}"),
        client: reqwest::Client::new(),
        mailer,
    }
}

impl TestServer {
    async fn act(&self, id: &str, action: Value) -> Value {
        let resp = self
            .client
            .post(format!("{}/api/onboarding/sessions/{id}/actions", self.base))
            .json(&action)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn session(&self, id: &str) -> Value {
        self.client
            .get(format!("{}/api/onboarding/sessions/{id}", self.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn create_session(&self) -> String {
        let resp = self
            .client
            .post(format!("{}/api/onboarding/sessions", self.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let json: Value = resp.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Drive a fresh session up to the practice step.
    async fn reach_practice(&self) -> String {
        let id = self.create_session().await;
        let steps = [
            json!({"type": "set_name", "name": "Amy"}),
            json!({"type": "advance"}),
            json!({"type": "select_goal", "goal_id": "exam"}),
            json!({"type": "advance"}),
            json!({"type": "set_detail", "key": "subject", "value": "history"}),
            json!({"type": "set_detail", "key": "examType", "value": "viva"}),
            json!({"type": "advance"}),
            json!({"type": "select_avatar", "avatar_id": "examiner"}),
            json!({"type": "advance"}),
        ];
        for step in steps {
            let json = self.act(&id, step.clone()).await;
            assert_eq!(json["applied"], true, "{step} should apply");
        }
        id
    }
}

// ── Onboarding ───────────────────────────────────────────────────────

#[tokio::test]
async fn onboarding_countdown_ends_in_paywall() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server(3, Duration::from_millis(50)).await;
        let id = server.reach_practice().await;

        let json = server.session(&id).await;
        assert_eq!(json["step"], "practice");
        assert_eq!(json["timer_active"], true);
        assert_eq!(json["details"]["subject"]["selected"], "history");

        tokio::time::sleep(Duration::from_millis(400)).await;

        let json = server.session(&id).await;
        assert_eq!(json["step"], "paywall");
        assert_eq!(json["remaining_seconds"], 0);
        assert_eq!(json["countdown"], "0:00");
        assert_eq!(json["timer_active"], false);
        assert_eq!(json["offers"].as_array().unwrap().len(), 2);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn onboarding_end_session_early() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server(300, Duration::from_secs(1)).await;
        let id = server.reach_practice().await;

        let json = server.act(&id, json!({"type": "end_session"})).await;
        assert_eq!(json["applied"], true);
        assert_eq!(json["session"]["step"], "paywall");
        assert_eq!(json["session"]["timer_active"], false);

        let remaining = json["session"]["remaining_seconds"].clone();
        tokio::time::sleep(Duration::from_millis(1_200)).await;
        assert_eq!(server.session(&id).await["remaining_seconds"], remaining);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn onboarding_details_gate() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server(300, Duration::from_secs(1)).await;
        let id = server.create_session().await;
        server.act(&id, json!({"type": "set_name", "name": "Amy"})).await;
        server.act(&id, json!({"type": "advance"})).await;
        server.act(&id, json!({"type": "select_goal", "goal_id": "interview"})).await;
        server.act(&id, json!({"type": "advance"})).await;

        server
            .act(&id, json!({"type": "set_detail", "key": "industry", "value": "custom"}))
            .await;
        server
            .act(&id, json!({"type": "set_detail", "key": "roleLevel", "value": "manager"}))
            .await;
        let json = server.act(&id, json!({"type": "advance"})).await;
        assert_eq!(json["applied"], false);
        assert_eq!(json["session"]["step"], "details");

        server
            .act(&id, json!({"type": "set_detail", "key": "customIndustry", "value": "Aerospace"}))
            .await;
        let json = server.act(&id, json!({"type": "advance"})).await;
        assert_eq!(json["applied"], true);
        assert_eq!(json["session"]["step"], "avatar");
    })
    .await
    .expect("test timed out");
}

// ── Contact relay ────────────────────────────────────────────────────

#[tokio::test]
async fn contact_request_is_relayed() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server(300, Duration::from_secs(1)).await;

        let resp = server
            .client
            .post(format!("{}/api/sendRequest", server.base))
            .json(&json!({
                "subject": "Holobox Request",
                "name": "Amy",
                "company": "Acme",
                "email": "amy@acme.test",
                "telephone": "0102030405",
                "size": "86inch",
                "color": "white"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["success"], true);

        let sent = server.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Holobox Request");
        assert!(sent[0].html.contains("<p><strong>Company:</strong> Acme</p>"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn contact_request_with_unknown_subject_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server(300, Duration::from_secs(1)).await;

        let resp = server
            .client
            .post(format!("{}/api/sendRequest", server.base))
            .json(&json!({"subject": "Newsletter"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "Invalid request subject");
        assert!(server.mailer.sent.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let server = start_server(300, Duration::from_secs(1)).await;
        let json: Value = server
            .client
            .get(format!("{}/health", server.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(json["status"], "ok");
    })
    .await
    .expect("test timed out");
}
