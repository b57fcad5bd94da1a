use std::sync::Arc;

use anyhow::Result;
use ircspy_core::display::DisplayState;
use tokio_util::sync::CancellationToken;

mod adapter;
mod handler;
pub mod irc;

pub use adapter::DisplayAdapter;
pub use handler::EventHandler;
pub use irc::{IrcSettings, ServerAddr, nick_of};

/// Connects to IRC and mirrors channel traffic onto `state` until `token`
/// is cancelled.
pub async fn run(
    settings: IrcSettings,
    state: Arc<DisplayState>,
    token: CancellationToken,
) -> Result<()> {
    let handler: Arc<dyn EventHandler> = Arc::new(DisplayAdapter::new(state));
    irc::run(settings, handler, token).await
}
