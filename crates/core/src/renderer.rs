//! Client renderer state machines.
//!
//! The delivered HTML bundles drive their UI from host callbacks; the
//! same lifecycle is modeled here as explicit machines with one
//! dispatch function per incoming event, so the iframe lifecycle and
//! its error paths are testable without a DOM. The scripts in
//! `crates/server/assets/` mirror these transitions.

use crate::connectors::configure_url;
use crate::token::decode_widget_token;

/// Observable phases of the iframe widget lifecycle.
///
/// Token decoding completes synchronously inside the tool-result
/// dispatch, so between events the machine is always in one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetPhase {
    Idle,
    AwaitingToken,
    Rendering { widget_url: String },
    Loaded { widget_url: String },
    Failed { message: String },
}

/// Host-delivered events driving the iframe lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The host started a tool call that will produce a widget token.
    ToolInput,
    /// The tool call finished.
    ToolResult(ToolOutcome),
    /// The injected iframe fired its load event.
    FrameLoaded,
    /// The injected iframe failed to load.
    FrameFailed { message: String },
    /// The host is tearing the widget down.
    Teardown,
}

/// Outcome of the widget-token tool call as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Token(String),
    /// `isError` tool result; the payload is its text.
    Error(String),
}

/// Iframe renderer lifecycle machine.
#[derive(Debug, Clone, Default)]
pub struct WidgetLifecycle {
    phase: WidgetPhase,
}

impl Default for WidgetPhase {
    fn default() -> Self {
        WidgetPhase::Idle
    }
}

impl WidgetLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &WidgetPhase {
        &self.phase
    }

    /// Apply one host event. Events that make no sense in the current
    /// phase are ignored; host callbacks can repeat or arrive late.
    pub fn dispatch(&mut self, event: WidgetEvent) -> &WidgetPhase {
        self.phase = match (std::mem::take(&mut self.phase), event) {
            // Teardown removes the iframe if present; always safe.
            (_, WidgetEvent::Teardown) => WidgetPhase::Idle,

            (WidgetPhase::Idle, WidgetEvent::ToolInput) => WidgetPhase::AwaitingToken,

            (WidgetPhase::AwaitingToken, WidgetEvent::ToolResult(ToolOutcome::Error(message))) => {
                WidgetPhase::Failed { message }
            }
            (WidgetPhase::AwaitingToken, WidgetEvent::ToolResult(ToolOutcome::Token(token))) => {
                match decode_widget_token(&token) {
                    Ok(payload) => WidgetPhase::Rendering {
                        widget_url: payload.widget_url,
                    },
                    Err(error) => WidgetPhase::Failed {
                        message: error.to_string(),
                    },
                }
            }

            (WidgetPhase::Rendering { widget_url }, WidgetEvent::FrameLoaded) => WidgetPhase::Loaded { widget_url },
            (WidgetPhase::Rendering { .. }, WidgetEvent::FrameFailed { message }) => WidgetPhase::Failed { message },

            (phase, _) => phase,
        };
        &self.phase
    }
}

/// Grid renderer state: single-select connector plus the last-received
/// widget token. The token is operationally unused for now — reserved
/// for a pre-authenticated browser handoff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    selected: Option<String>,
    widget_token: Option<String>,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last click wins.
    pub fn select(&mut self, connector_id: impl Into<String>) {
        self.selected = Some(connector_id.into());
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn record_widget_token(&mut self, token: impl Into<String>) {
        self.widget_token = Some(token.into());
    }

    pub fn widget_token(&self) -> Option<&str> {
        self.widget_token.as_deref()
    }

    /// External browser URL for the "configure" action, when a
    /// connector is selected.
    pub fn configure_url(&self) -> Option<String> {
        self.selected.as_deref().map(configure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    fn widget_token(url: &str) -> String {
        STANDARD.encode(format!(r#"{{"widgetUrl":"{url}"}}"#))
    }

    #[test]
    fn happy_path_reaches_loaded() {
        let mut lifecycle = WidgetLifecycle::new();
        lifecycle.dispatch(WidgetEvent::ToolInput);
        assert_eq!(lifecycle.phase(), &WidgetPhase::AwaitingToken);

        lifecycle.dispatch(WidgetEvent::ToolResult(ToolOutcome::Token(widget_token(
            "https://widget.airbyte.com/embed",
        ))));
        assert_eq!(
            lifecycle.phase(),
            &WidgetPhase::Rendering {
                widget_url: "https://widget.airbyte.com/embed".into()
            }
        );

        lifecycle.dispatch(WidgetEvent::FrameLoaded);
        assert_eq!(
            lifecycle.phase(),
            &WidgetPhase::Loaded {
                widget_url: "https://widget.airbyte.com/embed".into()
            }
        );
    }

    #[test]
    fn token_without_widget_url_fails_with_field_name() {
        let mut lifecycle = WidgetLifecycle::new();
        lifecycle.dispatch(WidgetEvent::ToolInput);
        let token = STANDARD.encode(r#"{"unexpected":true}"#);
        lifecycle.dispatch(WidgetEvent::ToolResult(ToolOutcome::Token(token)));

        match lifecycle.phase() {
            WidgetPhase::Failed { message } => assert!(message.contains("widgetUrl")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn error_tool_result_fails_with_its_text() {
        let mut lifecycle = WidgetLifecycle::new();
        lifecycle.dispatch(WidgetEvent::ToolInput);
        lifecycle.dispatch(WidgetEvent::ToolResult(ToolOutcome::Error(
            "application token request failed with HTTP status 401".into(),
        )));
        assert_eq!(
            lifecycle.phase(),
            &WidgetPhase::Failed {
                message: "application token request failed with HTTP status 401".into()
            }
        );
    }

    #[test]
    fn frame_failure_reaches_failed() {
        let mut lifecycle = WidgetLifecycle::new();
        lifecycle.dispatch(WidgetEvent::ToolInput);
        lifecycle.dispatch(WidgetEvent::ToolResult(ToolOutcome::Token(widget_token("https://w"))));
        lifecycle.dispatch(WidgetEvent::FrameFailed {
            message: "network error".into(),
        });
        assert_eq!(
            lifecycle.phase(),
            &WidgetPhase::Failed {
                message: "network error".into()
            }
        );
    }

    #[test]
    fn teardown_is_idempotent_from_any_phase() {
        let mut lifecycle = WidgetLifecycle::new();
        lifecycle.dispatch(WidgetEvent::ToolInput);
        lifecycle.dispatch(WidgetEvent::Teardown);
        assert_eq!(lifecycle.phase(), &WidgetPhase::Idle);
        lifecycle.dispatch(WidgetEvent::Teardown);
        assert_eq!(lifecycle.phase(), &WidgetPhase::Idle);
    }

    #[test]
    fn unexpected_events_are_ignored() {
        let mut lifecycle = WidgetLifecycle::new();
        lifecycle.dispatch(WidgetEvent::FrameLoaded);
        assert_eq!(lifecycle.phase(), &WidgetPhase::Idle);
        lifecycle.dispatch(WidgetEvent::ToolResult(ToolOutcome::Token("x".into())));
        assert_eq!(lifecycle.phase(), &WidgetPhase::Idle);
    }

    #[test]
    fn grid_selection_is_last_click_wins() {
        let mut grid = GridState::new();
        assert_eq!(grid.selected(), None);
        assert_eq!(grid.configure_url(), None);

        grid.select("salesforce");
        grid.select("stripe");
        assert_eq!(grid.selected(), Some("stripe"));
        assert_eq!(
            grid.configure_url().as_deref(),
            Some("https://cloud.airbyte.com/sources/new?connector=stripe")
        );
    }

    #[test]
    fn grid_keeps_the_last_widget_token() {
        let mut grid = GridState::new();
        grid.record_widget_token("first");
        grid.record_widget_token("second");
        assert_eq!(grid.widget_token(), Some("second"));
        assert_eq!(grid.selected(), None);
    }
}
