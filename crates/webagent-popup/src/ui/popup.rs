use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use webagent_models::{ActionType, ConnectionStatus};
use webagent_sdk::BackendClient;

use crate::app_state::AppController;
use crate::controller::{dispatch, section_fields, Field, Focus, PopupController, ResultView};
use crate::tui::Action;

/// Rows taken by the body input.
const BODY_HEIGHT: u16 = 7;

pub struct PopupApp {
    client: BackendClient,
    tx: UnboundedSender<Action>,
    controller: PopupController,
    should_quit: bool,
}

impl PopupApp {
    pub fn new(client: BackendClient, tx: UnboundedSender<Action>) -> Self {
        Self {
            client,
            tx,
            controller: PopupController::new(),
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &PopupController {
        &self.controller
    }

    /// Validate, then run the request on a task that reports back through
    /// the action channel.
    fn execute(&mut self) {
        let Some(request) = self.controller.begin_execute() else {
            return;
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = dispatch(&client, request).await;
            let _ = tx.send(Action::ExecuteFinished(outcome));
        });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Global controls
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::F(5) => return self.execute(),
            KeyCode::Tab => return self.controller.focus_next(),
            KeyCode::BackTab => return self.controller.focus_previous(),
            _ => {}
        }

        match self.controller.focus() {
            Focus::Selector => match key.code {
                KeyCode::Left => {
                    let action = self.controller.action().previous();
                    self.controller.select_action(action);
                }
                KeyCode::Right => {
                    let action = self.controller.action().next();
                    self.controller.select_action(action);
                }
                _ => {}
            },
            Focus::Field(field) => match key.code {
                KeyCode::Enter if field.is_multiline() => self.controller.insert_char('\n'),
                KeyCode::Enter => self.controller.focus_next(),
                KeyCode::Backspace => self.controller.backspace(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.controller.insert_char(c);
                }
                _ => {}
            },
            Focus::Execute => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.execute();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn focused_style(&self, focus: Focus) -> Style {
        if self.controller.focus() == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let color = match self.controller.status() {
            None => Color::DarkGray,
            Some(ConnectionStatus::Connected) => Color::Green,
            Some(ConnectionStatus::Error | ConnectionStatus::Unreachable) => Color::Red,
        };

        let mut spans = vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(
                self.controller.status_label(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(at) = self.controller.last_checked() {
            spans.push(Span::styled(
                format!("  (checked {})", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("WebAgent - {}", self.client.endpoints().base())),
        );
        f.render_widget(header, area);
    }

    fn render_selector(&self, f: &mut Frame, area: Rect) {
        let titles = ActionType::ALL.iter().map(|a| {
            if self.controller.is_section_visible(*a) {
                format!("▸ {}", a.label())
            } else {
                format!("  {}", a.label())
            }
        });
        let tabs = Tabs::new(titles)
            .select(self.controller.action().index())
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.focused_style(Focus::Selector))
                    .title("Action (←/→)"),
            );
        f.render_widget(tabs, area);
    }

    fn render_field(&self, f: &mut Frame, area: Rect, field: Field) {
        let focused = self.controller.focus() == Focus::Field(field);
        let value = self.controller.field(field);
        let input = Paragraph::new(value)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.focused_style(Focus::Field(field)))
                    .title(field.label()),
            );
        f.render_widget(input, area);

        if focused {
            let last_line = value.rsplit('\n').next().unwrap_or_default();
            let rows = u16::try_from(value.matches('\n').count()).unwrap_or(u16::MAX);
            let cols = u16::try_from(last_line.chars().count()).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(1).saturating_add(cols);
            let y = area.y.saturating_add(1).saturating_add(rows);
            let max_x = area.right().saturating_sub(2);
            let max_y = area.bottom().saturating_sub(2);
            f.set_cursor_position((x.min(max_x), y.min(max_y)));
        }
    }

    fn render_section(&self, f: &mut Frame, area: Rect) {
        let fields = section_fields(self.controller.action());
        if fields.is_empty() {
            let hint = Paragraph::new("Fetch a summary of your unread emails from the backend.")
                .block(Block::default().borders(Borders::ALL).title("Fetch Emails"));
            f.render_widget(hint, area);
            return;
        }

        let constraints: Vec<Constraint> = fields
            .iter()
            .map(|field| {
                if field.is_multiline() {
                    Constraint::Length(BODY_HEIGHT)
                } else {
                    Constraint::Length(3)
                }
            })
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (field, chunk) in fields.iter().zip(chunks.iter()) {
            self.render_field(f, *chunk, *field);
        }
    }

    fn render_execute(&self, f: &mut Frame, area: Rect) {
        let style = if self.controller.is_executing() {
            Style::default().fg(Color::DarkGray)
        } else if self.controller.focus() == Focus::Execute {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let button = Paragraph::new(Span::styled(
            format!("[ {} ]", self.controller.execute_label()),
            style,
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.focused_style(Focus::Execute)),
        );
        f.render_widget(button, area);
    }

    fn render_result(&self, f: &mut Frame, area: Rect) {
        let result = self.controller.result();
        let Some(text) = result.text() else {
            return;
        };

        let (title, color) = if result.is_error() {
            ("Error", Color::Red)
        } else if matches!(result, ResultView::Working(_)) {
            ("Working", Color::Yellow)
        } else {
            ("Result", Color::White)
        };

        let lines: Vec<Line> = text.lines().map(|l| styled_result_line(l, color)).collect();
        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(paragraph, area);
    }
}

/// Bold the `Label:` prefix of the rendered answer's header lines.
fn styled_result_line(line: &str, color: Color) -> Line<'static> {
    const LABELS: [&str; 5] = ["Mode:", "Task Type:", "Plan:", "Result:", "Error:"];
    let base = Style::default().fg(color);

    match LABELS.iter().find(|label| line.starts_with(*label)) {
        Some(label) => Line::from(vec![
            Span::styled((*label).to_string(), base.add_modifier(Modifier::BOLD)),
            Span::styled(line[label.len()..].to_string(), base),
        ]),
        None => Line::from(Span::styled(line.to_string(), base)),
    }
}

impl AppController for PopupApp {
    fn update(&mut self, action: Action) {
        match action {
            Action::Key(key) => self.handle_key(key),
            Action::HealthChecked(status) => self.controller.apply_health(status),
            Action::ExecuteFinished(outcome) => self.controller.finish_execute(outcome),
            Action::Resize(w, h) => debug!(w, h, "terminal resized"),
            Action::Tick => {}
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let section_height = section_fields(self.controller.action())
            .iter()
            .map(|field| if field.is_multiline() { BODY_HEIGHT } else { 3 })
            .sum::<u16>()
            .max(3);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // Status
                Constraint::Length(3),              // Action selector
                Constraint::Length(section_height), // Form section
                Constraint::Length(3),              // Execute
                Constraint::Min(0),                 // Result
                Constraint::Length(1),              // Help
            ])
            .split(f.area());

        self.render_status(f, chunks[0]);
        self.render_selector(f, chunks[1]);
        self.render_section(f, chunks[2]);
        self.render_execute(f, chunks[3]);
        self.render_result(f, chunks[4]);

        let help = Paragraph::new("Tab/Shift-Tab: focus | ←/→: action | Enter: next/run | F5: run | Esc: quit")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[5]);
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mock_backend::{router, MockState};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;
    use webagent_sdk::endpoints::{ASK_PATH, FETCH_EMAILS_PATH};
    use webagent_sdk::BackendConfig;

    use super::*;

    fn key(code: KeyCode) -> Action {
        Action::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut PopupApp, text: &str) {
        for c in text.chars() {
            app.update(key(KeyCode::Char(c)));
        }
    }

    async fn app_with_mock() -> (PopupApp, mpsc::UnboundedReceiver<Action>, Arc<MockState>) {
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
        let (tx, rx) = mpsc::unbounded_channel();
        (PopupApp::new(client, tx), rx, state)
    }

    async fn finish(app: &mut PopupApp, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("request did not finish")
            .expect("channel closed");
        assert!(matches!(action, Action::ExecuteFinished(_)));
        app.update(action);
    }

    fn screen(app: &mut PopupApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn chat_via_keyboard() {
        let (mut app, mut rx, state) = app_with_mock().await;
        type_text(&mut app, "what is rust");
        app.update(key(KeyCode::F(5)));
        assert!(app.controller().is_executing());
        assert!(screen(&mut app).contains("Processing..."));

        finish(&mut app, &mut rx).await;
        assert!(!app.controller().is_executing());
        assert_eq!(state.request_count(ASK_PATH), 1);

        let text = screen(&mut app);
        assert!(text.contains("Mode: Mock Backend"));
        assert!(text.contains("Execute Task"));
    }

    #[tokio::test]
    async fn empty_chat_shows_error_without_request() {
        let (mut app, mut rx, state) = app_with_mock().await;
        app.update(key(KeyCode::F(5)));
        assert!(!app.controller().is_executing());
        assert!(screen(&mut app).contains("Please enter a query"));
        assert!(rx.try_recv().is_err());
        assert_eq!(state.total_requests(), 0);
    }

    #[tokio::test]
    async fn selector_switches_sections() {
        let (mut app, _rx, _state) = app_with_mock().await;
        app.update(key(KeyCode::BackTab)); // Task -> Selector
        assert_eq!(app.controller().focus(), Focus::Selector);

        app.update(key(KeyCode::Right));
        assert_eq!(app.controller().action(), ActionType::SendEmail);
        let text = screen(&mut app);
        assert!(text.contains("┌Recipient"));
        assert!(!text.contains("┌Task"));

        app.update(key(KeyCode::Right));
        assert_eq!(app.controller().action(), ActionType::FetchEmail);
        assert!(!screen(&mut app).contains("┌Recipient"));
    }

    #[tokio::test]
    async fn fetch_via_execute_control() {
        let (mut app, mut rx, state) = app_with_mock().await;
        app.update(key(KeyCode::BackTab));
        app.update(key(KeyCode::Left)); // Chat -> FetchEmail
        assert_eq!(app.controller().action(), ActionType::FetchEmail);

        app.update(key(KeyCode::Tab)); // Selector -> Execute
        assert_eq!(app.controller().focus(), Focus::Execute);
        app.update(key(KeyCode::Enter));
        finish(&mut app, &mut rx).await;

        assert_eq!(state.request_count(FETCH_EMAILS_PATH), 1);
        assert!(matches!(app.controller().result(), ResultView::Ready(_)));
    }

    #[tokio::test]
    async fn health_updates_status_line() {
        let (mut app, _rx, _state) = app_with_mock().await;
        assert!(screen(&mut app).contains("Checking backend..."));
        app.update(Action::HealthChecked(ConnectionStatus::Error));
        assert!(screen(&mut app).contains("Backend Error"));
    }

    #[tokio::test]
    async fn escape_quits() {
        let (mut app, _rx, _state) = app_with_mock().await;
        assert!(!app.should_quit());
        app.update(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn result_labels_are_split_out() {
        let line = styled_result_line("Mode: chat", Color::White);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "Mode:");
        assert_eq!(line.spans[1].content, " chat");

        let plain = styled_result_line("1. step", Color::White);
        assert_eq!(plain.spans.len(), 1);
    }
}
