//! Non-interactive commands.
//!
//! Each command drives the same [`PopupController`] as the interactive
//! popup, so validation and rendering are identical; only the output goes
//! to stdout / stderr instead of the result area.

use std::process::ExitCode;

use webagent_models::ActionType;
use webagent_sdk::BackendClient;

use crate::controller::{dispatch, Field, PopupController, ResultView};

/// What to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShot {
    Health,
    Ask { query: String },
    SendEmail { recipient: String, subject: String, body: String },
    FetchEmails,
}

impl OneShot {
    /// Load the command's inputs into a fresh controller.
    fn prepare(&self) -> Option<PopupController> {
        let mut controller = PopupController::new();
        match self {
            Self::Health => return None,
            Self::Ask { query } => {
                controller.select_action(ActionType::Chat);
                controller.set_field(Field::Task, query.as_str());
            }
            Self::SendEmail { recipient, subject, body } => {
                controller.select_action(ActionType::SendEmail);
                controller.set_field(Field::Recipient, recipient.as_str());
                controller.set_field(Field::Subject, subject.as_str());
                controller.set_field(Field::Body, body.as_str());
            }
            Self::FetchEmails => controller.select_action(ActionType::FetchEmail),
        }
        Some(controller)
    }
}

/// Run `command` to completion and return the final result view.
///
/// `on_progress` receives the provisional copy once the request is sent.
pub async fn run_to_result(
    client: &BackendClient,
    command: &OneShot,
    mut on_progress: impl FnMut(&str),
) -> ResultView {
    let Some(mut controller) = command.prepare() else {
        let status = client.check_connection().await;
        return if status.is_connected() {
            ResultView::Ready(status.label().to_string())
        } else {
            ResultView::Error(status.label().to_string())
        };
    };

    if let Some(request) = controller.begin_execute() {
        if let Some(progress) = controller.result().text() {
            on_progress(progress);
        }
        let outcome = dispatch(client, request).await;
        controller.finish_execute(outcome);
    }

    controller.result().clone()
}

/// Run `command`, print its result, and map it to an exit code.
pub async fn run(client: &BackendClient, command: &OneShot) -> ExitCode {
    let result = run_to_result(client, command, |progress| eprintln!("{progress}")).await;
    match result {
        ResultView::Ready(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        ResultView::Error(text) | ResultView::Working(text) => {
            eprintln!("{text}");
            ExitCode::FAILURE
        }
        ResultView::Hidden => ExitCode::FAILURE,
    }
}
