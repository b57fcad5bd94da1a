//! Wires the IRC client, display state, and render scheduler together.

use std::sync::Arc;

use anyhow::{Context, Result};
use ircspy_bot::IrcSettings;
use ircspy_core::config::Config;
use ircspy_core::display::DisplayState;
use ircspy_core::render::Renderer;
use ircspy_core::scheduler::Scheduler;
use ircspy_core::sink::{DisplaySink, LogSink, TerminalSink};
use tokio_util::sync::CancellationToken;

use super::{Cli, SinkKind};

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let sink: Box<dyn DisplaySink + Send> = match cli.sink {
        SinkKind::Terminal => Box::new(TerminalSink::stdout()),
        SinkKind::Log => Box::new(LogSink::default()),
    };
    let settings = IrcSettings {
        server: cli.server,
        channel: cli.channel,
        nickname: cli.nickname,
        password: cli.password,
        realname: config.irc.realname.clone(),
        reconnect_delay: config.irc.reconnect_delay(),
    };

    let state = Arc::new(DisplayState::new(config.display.pauses()));
    let mut renderer = Renderer::new(Arc::clone(&state), sink);
    renderer.start().context("initialize display")?;

    let token = CancellationToken::new();
    let scheduler = Scheduler::start_with_token(
        config.display.tick_period(),
        renderer,
        token.child_token(),
    );

    tracing::info!(
        "ircspy started: {} {} as {} (tick {}ms, pauses {}/{})",
        settings.server,
        settings.channel,
        settings.nickname,
        config.display.tick_ms,
        config.display.start_pause,
        config.display.end_pause,
    );
    let mut bot = tokio::spawn(ircspy_bot::run(
        settings,
        Arc::clone(&state),
        token.child_token(),
    ));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let bot_result = tokio::select! {
        _ = &mut shutdown => {
            tracing::info!("shutting down");
            token.cancel();
            bot.await
        }
        finished = &mut bot => {
            token.cancel();
            finished
        }
    };

    let mut renderer = scheduler.stop().await?;
    renderer.shutdown().context("shut down display")?;
    bot_result.context("IRC task failed")?
}
