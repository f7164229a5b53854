//! Mock WebAgent backend.
//!
//! Serves the same four routes as the real agent with deterministic,
//! canned responses so the popup can be exercised without an LLM, an SMTP
//! account or network access.  Every request is recorded so tests can
//! assert on what the popup actually sent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tracing::info;
use webagent_models::{AskRequest, AskResponse, HealthResponse, MessageResponse, SendEmailRequest};
use webagent_sdk::endpoints::{ASK_PATH, FETCH_EMAILS_PATH, HEALTH_PATH, SEND_EMAIL_PATH};

/// `mode` reported by every `/ask` reply.
pub const MOCK_MODE: &str = "Mock Backend (canned responses)";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Mock backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Port to listen on (default `8000`).
    pub listen_port: u16,
    /// Start with `/health` answering 503.
    pub fail_health: bool,
}

impl MockConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                   | Default | Description                    |
    /// |----------------------------|---------|--------------------------------|
    /// | `MOCK_BACKEND_PORT`        | `8000`  | HTTP listen port               |
    /// | `MOCK_BACKEND_FAIL_HEALTH` | unset   | `1` makes `/health` answer 503 |
    pub fn from_env() -> Self {
        let listen_port = std::env::var("MOCK_BACKEND_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);
        let fail_health = std::env::var("MOCK_BACKEND_FAIL_HEALTH")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            listen_port,
            fail_health,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// One canned unread email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
}

/// State shared across all handlers.
#[derive(Debug, Default)]
pub struct MockState {
    fail_health: AtomicBool,
    requests: Mutex<Vec<&'static str>>,
    sent: Mutex<Vec<SendEmailRequest>>,
    inbox: Mutex<Vec<InboxEntry>>,
}

impl MockState {
    /// State seeded with two unread emails.
    pub fn new(fail_health: bool) -> Self {
        let state = Self::default();
        state.set_fail_health(fail_health);
        *lock(&state.inbox) = vec![
            InboxEntry {
                from: "alerts@pricewatch.example".into(),
                subject: "Price drop on your saved items".into(),
            },
            InboxEntry {
                from: "team@example.com".into(),
                subject: "Standup notes".into(),
            },
        ];
        state
    }

    /// Toggle `/health` between 200 and 503.
    pub fn set_fail_health(&self, fail: bool) {
        self.fail_health.store(fail, Ordering::SeqCst);
    }

    /// Replace the unread emails returned by `/fetch-emails`.
    pub fn set_inbox(&self, inbox: Vec<InboxEntry>) {
        *lock(&self.inbox) = inbox;
    }

    /// Number of requests received on `path`.
    pub fn request_count(&self, path: &str) -> usize {
        lock(&self.requests).iter().filter(|p| **p == path).count()
    }

    /// Total number of requests received.
    pub fn total_requests(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Every email accepted by `/send-email`, in order.
    pub fn sent_emails(&self) -> Vec<SendEmailRequest> {
        lock(&self.sent).clone()
    }

    fn record(&self, path: &'static str) {
        lock(&self.requests).push(path);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the mock backend router.
pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route(HEALTH_PATH, get(health))
        .route(ASK_PATH, post(ask))
        .route(SEND_EMAIL_PATH, post(send_email))
        .route(FETCH_EMAILS_PATH, post(fetch_emails))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root() -> Json<Value> {
    Json(json!({ "Message": "✅ Mock web agent is running" }))
}

async fn health(State(state): State<Arc<MockState>>) -> Result<Json<HealthResponse>, StatusCode> {
    state.record(HEALTH_PATH);
    if state.fail_health.load(Ordering::SeqCst) {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(HealthResponse {
        status: "Running ✅".into(),
    }))
}

async fn ask(State(state): State<Arc<MockState>>, Json(req): Json<AskRequest>) -> Json<AskResponse> {
    state.record(ASK_PATH);
    let task_type = classify(&req.query);
    info!(task_type = task_type.as_str(), "ask");
    Json(canned_answer(task_type, &req.query))
}

async fn send_email(
    State(state): State<Arc<MockState>>,
    Json(req): Json<SendEmailRequest>,
) -> Json<MessageResponse> {
    state.record(SEND_EMAIL_PATH);

    let message = if req.recipient.contains('@') {
        info!(recipient = %req.recipient, "email accepted");
        lock(&state.sent).push(req);
        "✅ Email sent successfully".to_string()
    } else {
        format!("❌ Error sending email: invalid recipient \"{}\"", req.recipient)
    };

    Json(MessageResponse { message })
}

async fn fetch_emails(State(state): State<Arc<MockState>>) -> Json<MessageResponse> {
    state.record(FETCH_EMAILS_PATH);
    let inbox = lock(&state.inbox).clone();
    Json(MessageResponse {
        message: render_inbox(&inbox),
    })
}

// ---------------------------------------------------------------------------
// Canned behaviour
// ---------------------------------------------------------------------------

/// Query classes, using the same keyword rules as the real agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    /// Shopping and price comparison.
    Ecommerce,
    /// Page scraping.
    Scraper,
    /// Email requests typed into the chat box.
    Mail,
    /// Short factual questions.
    Simple,
    /// Everything else.
    General,
}

impl TaskType {
    /// Wire name reported in `task_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ecommerce => "ecommerce",
            Self::Scraper => "scraper",
            Self::Mail => "mail",
            Self::Simple => "simple",
            Self::General => "general",
        }
    }
}

const ECOMMERCE_WORDS: [&str; 6] = ["buy", "purchase", "shop", "compare", "product", "price"];
const SCRAPER_WORDS: [&str; 4] = ["scrape", "extract", "fetch data", "get content from"];
const MAIL_WORDS: [&str; 4] = ["email", "send mail", "compose email", "latest mail"];
const SIMPLE_WORDS: [&str; 9] = [
    "what", "who", "when", "where", "capital", "define", "explain", "tell me", "how many",
];

/// Classify a query the way the agent does.
pub fn classify(query: &str) -> TaskType {
    let lower = query.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&ECOMMERCE_WORDS) {
        TaskType::Ecommerce
    } else if has(&SCRAPER_WORDS) {
        TaskType::Scraper
    } else if has(&MAIL_WORDS) {
        TaskType::Mail
    } else if has(&SIMPLE_WORDS) && query.split_whitespace().count() < 15 {
        TaskType::Simple
    } else {
        TaskType::General
    }
}

fn extract_url(query: &str) -> Option<&str> {
    query
        .split_whitespace()
        .find(|w| w.starts_with("http://") || w.starts_with("https://"))
}

fn canned_answer(task_type: TaskType, query: &str) -> AskResponse {
    let (plan, answer): (&[&str], String) = match task_type {
        TaskType::Ecommerce => (
            &[
                "Search product listings",
                "Compare prices across platforms",
                "Recommend the best option",
            ],
            format!("🛒 Canned comparison for \"{query}\": best price ₹49,999 on Example Store."),
        ),
        TaskType::Scraper => match extract_url(query) {
            Some(url) => (
                &["Extract URL", "Fetch Content", "Format Data"],
                format!("📄 Canned content scraped from {url}"),
            ),
            None => (
                &["Error"],
                "❌ Please provide a valid URL to scrape. Example: 'scrape https://example.com'"
                    .to_string(),
            ),
        },
        TaskType::Mail => (
            &["Email Tool"],
            "Please use the Email section in the extension to send or fetch emails.".to_string(),
        ),
        TaskType::Simple => (&["Direct Answer"], format!("Canned answer to \"{query}\".")),
        TaskType::General => (
            &["Understand the task", "Break it into steps", "Execute and summarise"],
            format!("Canned plan executed for \"{query}\"."),
        ),
    };

    AskResponse {
        mode: MOCK_MODE.to_string(),
        task_type: Some(task_type.as_str().to_string()),
        plan: Some(plan.iter().map(|s| (*s).to_string()).collect()),
        answer,
    }
}

fn render_inbox(inbox: &[InboxEntry]) -> String {
    if inbox.is_empty() {
        return "📭 No emails found in inbox".to_string();
    }

    let fetched_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
    let mut out = format!("📬 {} unread email(s) as of {fetched_at}:\n", inbox.len());
    for (i, entry) in inbox.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. From: {}\n   Subject: {}\n",
            i + 1,
            entry.from,
            entry.subject
        ));
    }
    out
}
