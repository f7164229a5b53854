//! Plain-text rendering of backend replies.

use std::fmt::Write as _;

use crate::api::AskResponse;

/// Substring the backend puts in a `message` when an email was sent.
pub const SUCCESS_MARKER: &str = "✅";

/// Whether a send-email `message` reports success.
pub fn is_success_message(message: &str) -> bool {
    message.contains(SUCCESS_MARKER)
}

/// Render an `/ask` reply.
///
/// Mode first, then the task type and a numbered plan when present, then
/// the answer after a blank line.
///
/// ```
/// use webagent_models::{render_answer, AskResponse};
///
/// let text = render_answer(&AskResponse {
///     mode: "chat".into(),
///     task_type: None,
///     plan: None,
///     answer: "hi".into(),
/// });
/// assert_eq!(text, "Mode: chat\n\nResult:\nhi");
/// ```
pub fn render_answer(resp: &AskResponse) -> String {
    let mut out = format!("Mode: {}\n", resp.mode);

    if let Some(task_type) = &resp.task_type {
        let _ = writeln!(out, "Task Type: {task_type}");
    }

    if let Some(plan) = &resp.plan {
        out.push_str("Plan:\n");
        for (i, step) in plan.iter().enumerate() {
            let _ = writeln!(out, "{}. {step}", i + 1);
        }
    }

    let _ = write!(out, "\nResult:\n{}", resp.answer);
    out
}

/// Prefix an error message the way the result area shows it.
pub fn render_error(message: &str) -> String {
    format!("Error: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(task_type: Option<&str>, plan: Option<Vec<&str>>) -> AskResponse {
        AskResponse {
            mode: "Local LLM".into(),
            task_type: task_type.map(String::from),
            plan: plan.map(|p| p.into_iter().map(String::from).collect()),
            answer: "42".into(),
        }
    }

    #[test]
    fn chat_reply_without_plan() {
        let text = render_answer(&AskResponse {
            mode: "chat".into(),
            task_type: None,
            plan: None,
            answer: "hi".into(),
        });
        assert!(text.contains("Mode: chat"));
        assert!(text.contains("hi"));
        assert!(!text.contains("Plan:"));
        assert!(!text.contains("Task Type:"));
    }

    #[test]
    fn plan_steps_numbered_in_order() {
        let text = render_answer(&answer(
            Some("ecommerce"),
            Some(vec!["Search", "Compare", "Recommend"]),
        ));
        assert_eq!(
            text,
            "Mode: Local LLM\n\
             Task Type: ecommerce\n\
             Plan:\n\
             1. Search\n\
             2. Compare\n\
             3. Recommend\n\
             \n\
             Result:\n\
             42"
        );
    }

    #[test]
    fn empty_plan_still_prints_header() {
        let text = render_answer(&answer(None, Some(vec![])));
        assert!(text.contains("Plan:\n\nResult:"));
    }

    #[test]
    fn success_marker_detection() {
        assert!(is_success_message("✅ Email sent successfully"));
        assert!(!is_success_message("❌ Error sending email: timeout"));
        assert!(!is_success_message("⚠️ SMTP credentials not configured"));
    }

    #[test]
    fn error_prefix() {
        assert_eq!(render_error("HTTP error! status: 500"), "Error: HTTP error! status: 500");
    }
}
