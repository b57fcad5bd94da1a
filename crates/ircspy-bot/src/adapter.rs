use std::sync::Arc;

use ircspy_core::display::DisplayState;

use crate::handler::EventHandler;
use crate::irc::nick_of;

const STATUS_CONNECT: &str = "IRC Spy: Connect";
const STATUS_JOINING: &str = "Joining...";
const STATUS_JOINED: &str = "IRC Spy: Joined";
const STATUS_ERROR: &str = "ERROR:";

/// Shows IRC events on the two-line display.
///
/// Every event replaces both lines at once so a frame never pairs a new
/// header with an old body.
pub struct DisplayAdapter {
    state: Arc<DisplayState>,
}

impl DisplayAdapter {
    pub fn new(state: Arc<DisplayState>) -> Self {
        Self { state }
    }

    fn show_message(&self, source: &str, target: &str, text: &str) {
        self.state.replace(format!("{}>{target}", nick_of(source)), text);
    }
}

impl EventHandler for DisplayAdapter {
    fn on_welcome(&self) {
        self.state.replace(STATUS_CONNECT, STATUS_JOINING);
    }

    fn on_join(&self, channel: &str) {
        tracing::info!("joined {channel}");
        self.state.replace(STATUS_JOINED, channel);
    }

    fn on_pubmsg(&self, source: &str, target: &str, text: &str) {
        self.show_message(source, target, text);
    }

    fn on_privmsg(&self, source: &str, target: &str, text: &str) {
        self.show_message(source, target, text);
    }

    fn on_action(&self, source: &str, target: &str, text: &str) {
        self.state.replace(
            format!("*ACTION>{target}"),
            format!("{} {text}", nick_of(source)),
        );
    }

    fn on_disconnect(&self) {
        self.state.replace(STATUS_ERROR, "Disconnected");
    }

    fn on_password_rejected(&self) {
        self.state.replace(STATUS_ERROR, "Bad Password");
    }

    fn on_nickname_in_use(&self, nickname: &str) -> String {
        let next = format!("{nickname}_");
        tracing::info!("nickname {nickname} in use, retrying as {next}");
        next
    }
}
