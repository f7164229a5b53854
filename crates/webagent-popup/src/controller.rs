//! Popup controller: the state behind every popup surface.
//!
//! [`PopupController`] owns the selected action, the form inputs, the
//! result area and the connection status.  It never touches the network
//! itself: [`PopupController::begin_execute`] validates the form and hands
//! back an [`ExecuteRequest`], the caller runs it through [`dispatch`], and
//! [`PopupController::finish_execute`] renders the outcome.

use chrono::{DateTime, Local};
use tracing::{info, warn};
use webagent_models::{
    is_success_message, render_answer, render_error, validate_query, ActionType, AskRequest,
    AskResponse, ConnectionStatus, EmailDraft, MessageResponse, ProgressMessage, SendEmailRequest,
};
use webagent_sdk::BackendClient;

/// Provisional copy for the email actions.
const WORKING: &str = "Working...";
/// Status text shown until the first health probe returns.
const CHECKING: &str = "Checking backend...";

// ---------------------------------------------------------------------------
// Requests and replies
// ---------------------------------------------------------------------------

/// The single request produced by a successful execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteRequest {
    /// `POST /ask`.
    Ask(AskRequest),
    /// `POST /send-email`.
    SendEmail(SendEmailRequest),
    /// `POST /fetch-emails`.
    FetchEmails,
}

/// A decoded backend reply, tagged by the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    Answer(AskResponse),
    EmailSent(MessageResponse),
    Inbox(MessageResponse),
}

/// What an execute attempt came back with.  Errors are already reduced to
/// their display text.
pub type ExecuteOutcome = Result<BackendReply, String>;

/// Run `request` against the backend.
pub async fn dispatch(client: &BackendClient, request: ExecuteRequest) -> ExecuteOutcome {
    let result = match request {
        ExecuteRequest::Ask(req) => client.ask(&req).await.map(BackendReply::Answer),
        ExecuteRequest::SendEmail(req) => client.send_email(&req).await.map(BackendReply::EmailSent),
        ExecuteRequest::FetchEmails => client.fetch_emails().await.map(BackendReply::Inbox),
    };

    result.map_err(|e| {
        warn!(error = %e, "execute failed");
        e.to_string()
    })
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// The result area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Hidden,
    /// Provisional copy while a request is in flight.
    Working(String),
    /// Rendered backend reply.
    Ready(String),
    /// Validation or request error, already prefixed with `Error:`.
    Error(String),
}

impl ResultView {
    /// Text to display, `None` when hidden.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::Working(t) | Self::Ready(t) | Self::Error(t) => Some(t),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Editable text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Task,
    Recipient,
    Subject,
    Body,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Recipient => "Recipient",
            Self::Subject => "Subject",
            Self::Body => "Body",
        }
    }

    /// Only the body accepts newlines.
    pub fn is_multiline(self) -> bool {
        matches!(self, Self::Body)
    }
}

/// Which control has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Selector,
    Field(Field),
    Execute,
}

/// Inputs belonging to each action's form section.
pub fn section_fields(action: ActionType) -> &'static [Field] {
    match action {
        ActionType::Chat => &[Field::Task],
        ActionType::SendEmail => &[Field::Recipient, Field::Subject, Field::Body],
        ActionType::FetchEmail => &[],
    }
}

// ---------------------------------------------------------------------------
// PopupController
// ---------------------------------------------------------------------------

/// Popup state.  Idle ⇄ in-flight; only one execute at a time.
#[derive(Debug, Clone)]
pub struct PopupController {
    action: ActionType,
    task: String,
    email: EmailDraft,
    focus: Focus,
    result: ResultView,
    status: Option<ConnectionStatus>,
    last_checked: Option<DateTime<Local>>,
    in_flight: bool,
}

impl Default for PopupController {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupController {
    pub fn new() -> Self {
        Self {
            action: ActionType::default(),
            task: String::new(),
            email: EmailDraft::default(),
            focus: Focus::Field(Field::Task),
            result: ResultView::Hidden,
            status: None,
            last_checked: None,
            in_flight: false,
        }
    }

    // ------------------------------------------------------------------
    // Section toggle
    // ------------------------------------------------------------------

    pub fn action(&self) -> ActionType {
        self.action
    }

    /// Show `action`'s section, hide the others, hide the result.
    pub fn select_action(&mut self, action: ActionType) {
        self.action = action;
        self.result = ResultView::Hidden;
        if let Focus::Field(field) = self.focus {
            if !section_fields(action).contains(&field) {
                self.focus = Focus::Selector;
            }
        }
    }

    /// Whether `action`'s section is the visible one.
    pub fn is_section_visible(&self, action: ActionType) -> bool {
        self.action == action
    }

    // ------------------------------------------------------------------
    // Focus and editing
    // ------------------------------------------------------------------

    pub fn focus(&self) -> Focus {
        self.focus
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Selector];
        order.extend(section_fields(self.action).iter().copied().map(Focus::Field));
        order.push(Focus::Execute);
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(pos + 1) % order.len()];
    }

    pub fn focus_previous(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(pos + order.len() - 1) % order.len()];
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Task => &self.task,
            Field::Recipient => &self.email.recipient,
            Field::Subject => &self.email.subject,
            Field::Body => &self.email.body,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Task => &mut self.task,
            Field::Recipient => &mut self.email.recipient,
            Field::Subject => &mut self.email.subject,
            Field::Body => &mut self.email.body,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Append `c` to the focused field, if any.
    pub fn insert_char(&mut self, c: char) {
        if let Focus::Field(field) = self.focus {
            if c == '\n' && !field.is_multiline() {
                return;
            }
            self.field_mut(field).push(c);
        }
    }

    /// Delete the last character of the focused field, if any.
    pub fn backspace(&mut self) {
        if let Focus::Field(field) = self.focus {
            self.field_mut(field).pop();
        }
    }

    // ------------------------------------------------------------------
    // Execute
    // ------------------------------------------------------------------

    /// Whether the execute control is disabled.
    pub fn is_executing(&self) -> bool {
        self.in_flight
    }

    pub fn execute_label(&self) -> &'static str {
        if self.in_flight {
            "Processing..."
        } else {
            "Execute Task"
        }
    }

    /// Validate the visible section and, if it passes, go in-flight.
    ///
    /// Returns `None` without touching the network state when a request
    /// is already in flight or validation fails; a validation failure is
    /// rendered into the result area.
    pub fn begin_execute(&mut self) -> Option<ExecuteRequest> {
        if self.in_flight {
            return None;
        }

        let (request, progress) = match self.action {
            ActionType::Chat => match validate_query(&self.task) {
                Ok(req) => {
                    let progress = ProgressMessage::from_query(&req.query).text();
                    (ExecuteRequest::Ask(req), progress)
                }
                Err(e) => {
                    self.result = ResultView::Error(render_error(&e.to_string()));
                    return None;
                }
            },
            ActionType::SendEmail => match self.email.validate() {
                Ok(req) => (ExecuteRequest::SendEmail(req), WORKING),
                Err(e) => {
                    self.result = ResultView::Error(render_error(&e.to_string()));
                    return None;
                }
            },
            ActionType::FetchEmail => (ExecuteRequest::FetchEmails, WORKING),
        };

        info!(action = %self.action, "execute");
        self.in_flight = true;
        self.result = ResultView::Working(progress.to_string());
        Some(request)
    }

    /// Render `outcome` and re-enable the execute control.
    ///
    /// A result hidden by switching action while in flight stays hidden.
    pub fn finish_execute(&mut self, outcome: ExecuteOutcome) {
        self.in_flight = false;
        let hidden = self.result == ResultView::Hidden;
        let view = match outcome {
            Ok(BackendReply::Answer(resp)) => ResultView::Ready(render_answer(&resp)),
            Ok(BackendReply::EmailSent(resp)) => {
                if is_success_message(&resp.message) {
                    self.email.clear();
                }
                ResultView::Ready(resp.message)
            }
            Ok(BackendReply::Inbox(resp)) => ResultView::Ready(resp.message),
            Err(message) => ResultView::Error(render_error(&message)),
        };
        if !hidden {
            self.result = view;
        }
    }

    pub fn result(&self) -> &ResultView {
        &self.result
    }

    // ------------------------------------------------------------------
    // Connection status
    // ------------------------------------------------------------------

    pub fn apply_health(&mut self, status: ConnectionStatus) {
        self.status = Some(status);
        self.last_checked = Some(Local::now());
    }

    pub fn status(&self) -> Option<ConnectionStatus> {
        self.status
    }

    pub fn status_label(&self) -> &'static str {
        self.status.map_or(CHECKING, ConnectionStatus::label)
    }

    pub fn last_checked(&self) -> Option<DateTime<Local>> {
        self.last_checked
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mock_backend::{router, MockState};
    use webagent_sdk::endpoints::{ASK_PATH, SEND_EMAIL_PATH};
    use webagent_sdk::{BackendConfig, SdkError};

    use super::*;

    fn email_controller(recipient: &str, subject: &str, body: &str) -> PopupController {
        let mut c = PopupController::new();
        c.select_action(ActionType::SendEmail);
        c.set_field(Field::Recipient, recipient);
        c.set_field(Field::Subject, subject);
        c.set_field(Field::Body, body);
        c
    }

    fn message(text: &str) -> MessageResponse {
        MessageResponse {
            message: text.into(),
        }
    }

    async fn mock_client() -> (BackendClient, Arc<MockState>) {
        let state = Arc::new(MockState::new(false));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = BackendClient::new(&BackendConfig {
            base_url: format!("http://{addr}"),
            ..BackendConfig::default()
        })
        .unwrap();
        (client, state)
    }

    // -- section toggle -----------------------------------------------------

    #[test]
    fn exactly_one_section_visible() {
        let mut c = PopupController::new();
        for selected in ActionType::ALL {
            c.select_action(selected);
            let visible: Vec<_> = ActionType::ALL
                .into_iter()
                .filter(|a| c.is_section_visible(*a))
                .collect();
            assert_eq!(visible, vec![selected]);
        }
    }

    #[test]
    fn selecting_hides_result() {
        let mut c = PopupController::new();
        assert!(c.begin_execute().is_none());
        assert!(c.result().is_error());

        c.select_action(ActionType::FetchEmail);
        assert_eq!(c.result(), &ResultView::Hidden);
    }

    #[test]
    fn focus_leaves_hidden_field() {
        let mut c = PopupController::new();
        assert_eq!(c.focus(), Focus::Field(Field::Task));
        c.select_action(ActionType::SendEmail);
        assert_eq!(c.focus(), Focus::Selector);
    }

    #[test]
    fn focus_cycles_through_section() {
        let mut c = PopupController::new();
        c.select_action(ActionType::SendEmail);
        let mut seen = vec![c.focus()];
        for _ in 0..4 {
            c.focus_next();
            seen.push(c.focus());
        }
        assert_eq!(
            seen,
            vec![
                Focus::Selector,
                Focus::Field(Field::Recipient),
                Focus::Field(Field::Subject),
                Focus::Field(Field::Body),
                Focus::Execute,
            ]
        );
        c.focus_next();
        assert_eq!(c.focus(), Focus::Selector);
        c.focus_previous();
        assert_eq!(c.focus(), Focus::Execute);
    }

    #[test]
    fn newline_only_in_body() {
        let mut c = PopupController::new();
        c.insert_char('a');
        c.insert_char('\n');
        assert_eq!(c.field(Field::Task), "a");
        c.backspace();
        assert_eq!(c.field(Field::Task), "");

        c.select_action(ActionType::SendEmail);
        c.focus_previous(); // Execute
        c.focus_previous(); // Body
        c.insert_char('x');
        c.insert_char('\n');
        c.insert_char('y');
        assert_eq!(c.field(Field::Body), "x\ny");
    }

    // -- validation ---------------------------------------------------------

    #[test]
    fn empty_query_makes_no_request() {
        let mut c = PopupController::new();
        c.set_field(Field::Task, "   ");
        assert_eq!(c.begin_execute(), None);
        assert!(!c.is_executing());
        assert_eq!(
            c.result(),
            &ResultView::Error("Error: Please enter a query".into())
        );
    }

    #[test]
    fn any_empty_email_field_makes_no_request() {
        for (r, s, b) in [("", "s", "b"), ("r@x", "", "b"), ("r@x", "s", " ")] {
            let mut c = email_controller(r, s, b);
            assert_eq!(c.begin_execute(), None);
            assert!(!c.is_executing());
            assert_eq!(
                c.result(),
                &ResultView::Error("Error: Please fill in all email fields".into())
            );
        }
    }

    #[test]
    fn chat_progress_copy_follows_query() {
        let mut c = PopupController::new();
        c.set_field(Field::Task, "compare phone prices");
        let req = c.begin_execute().unwrap();
        assert_eq!(
            req,
            ExecuteRequest::Ask(AskRequest {
                query: "compare phone prices".into()
            })
        );
        assert_eq!(
            c.result(),
            &ResultView::Working(ProgressMessage::Shopping.text().into())
        );
    }

    #[test]
    fn fetch_needs_no_input() {
        let mut c = PopupController::new();
        c.select_action(ActionType::FetchEmail);
        assert_eq!(c.begin_execute(), Some(ExecuteRequest::FetchEmails));
        assert_eq!(c.result(), &ResultView::Working("Working...".into()));
    }

    // -- in-flight ----------------------------------------------------------

    #[test]
    fn disabled_exactly_while_in_flight() {
        let mut c = PopupController::new();
        c.set_field(Field::Task, "hello");
        assert!(!c.is_executing());
        assert_eq!(c.execute_label(), "Execute Task");

        assert!(c.begin_execute().is_some());
        assert!(c.is_executing());
        assert_eq!(c.execute_label(), "Processing...");
        assert_eq!(c.begin_execute(), None, "second execute ignored");

        c.finish_execute(Err("HTTP error! status: 500".into()));
        assert!(!c.is_executing());
        assert_eq!(c.execute_label(), "Execute Task");

        assert!(c.begin_execute().is_some());
        c.finish_execute(Ok(BackendReply::Inbox(message("ok"))));
        assert!(!c.is_executing());
    }

    #[test]
    fn switching_action_in_flight_keeps_result_hidden() {
        let mut c = PopupController::new();
        c.set_field(Field::Task, "hello");
        assert!(c.begin_execute().is_some());

        c.select_action(ActionType::SendEmail);
        assert!(c.is_executing());
        c.finish_execute(Ok(BackendReply::Answer(AskResponse {
            mode: "chat".into(),
            task_type: None,
            plan: None,
            answer: "hi".into(),
        })));

        assert!(!c.is_executing());
        assert_eq!(c.action(), ActionType::SendEmail);
        assert_eq!(c.result(), &ResultView::Hidden);

        assert!(c.begin_execute().is_none());
        assert!(c.result().is_error(), "next execute renders normally");
    }

    #[test]
    fn hidden_email_success_still_clears_fields() {
        let mut c = email_controller("bob@example.com", "Hi", "Hello");
        assert!(c.begin_execute().is_some());
        c.select_action(ActionType::Chat);
        c.finish_execute(Ok(BackendReply::EmailSent(message("✅ Email sent successfully"))));

        assert_eq!(c.result(), &ResultView::Hidden);
        assert_eq!(c.field(Field::Recipient), "");
        assert_eq!(c.field(Field::Subject), "");
        assert_eq!(c.field(Field::Body), "");
    }

    // -- rendering ----------------------------------------------------------

    #[test]
    fn answer_without_plan() {
        let mut c = PopupController::new();
        c.set_field(Field::Task, "hi");
        c.begin_execute();
        c.finish_execute(Ok(BackendReply::Answer(AskResponse {
            mode: "chat".into(),
            task_type: None,
            plan: None,
            answer: "hi".into(),
        })));
        let text = c.result().text().unwrap();
        assert!(text.contains("Mode: chat"));
        assert!(text.contains("hi"));
        assert!(!text.contains("Plan:"));
    }

    #[test]
    fn answer_with_three_step_plan() {
        let mut c = PopupController::new();
        c.set_field(Field::Task, "plan it");
        c.begin_execute();
        c.finish_execute(Ok(BackendReply::Answer(AskResponse {
            mode: "chat".into(),
            task_type: Some("general".into()),
            plan: Some(vec!["alpha".into(), "beta".into(), "gamma".into()]),
            answer: "done".into(),
        })));
        let text = c.result().text().unwrap();
        let a = text.find("1. alpha").unwrap();
        let b = text.find("2. beta").unwrap();
        let g = text.find("3. gamma").unwrap();
        assert!(a < b && b < g);
        assert!(text.contains("Task Type: general"));
    }

    #[test]
    fn error_shows_status_code() {
        let mut c = PopupController::new();
        c.select_action(ActionType::FetchEmail);
        c.begin_execute();
        c.finish_execute(Err(SdkError::Status(404).to_string()));
        assert_eq!(
            c.result(),
            &ResultView::Error("Error: HTTP error! status: 404".into())
        );
    }

    #[test]
    fn success_marker_clears_email_fields() {
        let mut c = email_controller("bob@example.com", "Hi", "Hello");
        c.begin_execute();
        c.finish_execute(Ok(BackendReply::EmailSent(message("✅ Email sent successfully"))));
        for field in [Field::Recipient, Field::Subject, Field::Body] {
            assert_eq!(c.field(field), "");
        }
        assert_eq!(
            c.result(),
            &ResultView::Ready("✅ Email sent successfully".into())
        );
    }

    #[test]
    fn failure_message_keeps_email_fields() {
        let mut c = email_controller("bob@example.com", "Hi", "Hello");
        c.begin_execute();
        c.finish_execute(Ok(BackendReply::EmailSent(message("❌ Error sending email"))));
        assert_eq!(c.field(Field::Recipient), "bob@example.com");
        assert_eq!(c.field(Field::Subject), "Hi");
        assert_eq!(c.field(Field::Body), "Hello");
    }

    #[test]
    fn request_error_keeps_email_fields() {
        let mut c = email_controller("bob@example.com", "Hi", "Hello");
        c.begin_execute();
        c.finish_execute(Err("HTTP error! status: 500".into()));
        assert_eq!(c.field(Field::Recipient), "bob@example.com");
    }

    // -- status -------------------------------------------------------------

    #[test]
    fn status_placeholder_until_first_probe() {
        let mut c = PopupController::new();
        assert_eq!(c.status_label(), "Checking backend...");
        assert!(c.last_checked().is_none());

        c.apply_health(ConnectionStatus::Unreachable);
        assert_eq!(c.status_label(), "Backend Not Running");
        assert!(c.last_checked().is_some());
    }

    // -- dispatch against the mock backend ----------------------------------

    #[tokio::test]
    async fn chat_flow_end_to_end() {
        let (client, state) = mock_client().await;
        let mut c = PopupController::new();
        c.set_field(Field::Task, "What is the capital of France?");

        let req = c.begin_execute().unwrap();
        let outcome = dispatch(&client, req).await;
        c.finish_execute(outcome);

        let text = c.result().text().unwrap();
        assert!(text.starts_with("Mode: "));
        assert!(text.contains("Task Type: simple"));
        assert!(text.contains("1. Direct Answer"));
        assert_eq!(state.request_count(ASK_PATH), 1);
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_backend() {
        let (_client, state) = mock_client().await;
        let mut c = email_controller("bob@example.com", "", "Hello");
        assert!(c.begin_execute().is_none());
        assert_eq!(state.request_count(SEND_EMAIL_PATH), 0);
        assert_eq!(state.total_requests(), 0);
    }

    #[tokio::test]
    async fn send_email_flow_clears_on_success() {
        let (client, state) = mock_client().await;
        let mut c = email_controller("bob@example.com", "Hi", "Hello");

        let req = c.begin_execute().unwrap();
        c.finish_execute(dispatch(&client, req).await);

        assert_eq!(c.field(Field::Recipient), "");
        assert_eq!(state.sent_emails().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_backend_renders_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = BackendClient::new(&BackendConfig {
            base_url: format!("http://{addr}"),
            ..BackendConfig::default()
        })
        .unwrap();

        let mut c = PopupController::new();
        c.select_action(ActionType::FetchEmail);
        let req = c.begin_execute().unwrap();
        c.finish_execute(dispatch(&client, req).await);

        assert!(!c.is_executing());
        assert!(c.result().is_error());
        assert!(c.result().text().unwrap().starts_with("Error: request failed"));
    }
}
