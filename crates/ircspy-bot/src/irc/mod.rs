//! Minimal IRC client: registers, joins one channel, and reports traffic to
//! an [`EventHandler`]. Reconnects after a fixed delay until cancelled.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio_util::sync::CancellationToken;

use crate::handler::EventHandler;

mod addr;
mod message;

pub use addr::{AddrParseError, DEFAULT_PORT, ServerAddr};
pub use message::{Command, Event, Message, nick_of};

const QUIT_MESSAGE: &str = "ircspy shutting down";

/// Longest line accepted from the server: 8191 bytes of message tags plus
/// the 512-byte message itself.
const MAX_LINE: u64 = 8191 + 512;

pub struct IrcSettings {
    pub server: ServerAddr,
    pub channel: String,
    pub nickname: String,
    pub password: Option<String>,
    pub realname: String,
    pub reconnect_delay: Duration,
}

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Closed,
    /// The server refused our password; already reported to the handler.
    Rejected,
    Cancelled,
}

/// Runs sessions back to back until `token` is cancelled.
pub async fn run(
    settings: IrcSettings,
    handler: Arc<dyn EventHandler>,
    token: CancellationToken,
) -> Result<()> {
    loop {
        tracing::info!("connecting to {}", settings.server);
        match session(&settings, handler.as_ref(), &token).await {
            Ok(SessionEnd::Cancelled) => return Ok(()),
            Ok(SessionEnd::Rejected) => {
                tracing::warn!("{} rejected the connection password", settings.server);
            }
            Ok(SessionEnd::Closed) => {
                tracing::warn!("disconnected from {}", settings.server);
                handler.on_disconnect();
            }
            Err(err) => {
                tracing::warn!("connection to {} failed: {err:#}", settings.server);
                handler.on_disconnect();
            }
        }

        tracing::info!(
            "reconnecting in {}s",
            settings.reconnect_delay.as_secs_f32()
        );
        tokio::select! {
            () = token.cancelled() => return Ok(()),
            () = tokio::time::sleep(settings.reconnect_delay) => {}
        }
    }
}

async fn session(
    settings: &IrcSettings,
    handler: &dyn EventHandler,
    token: &CancellationToken,
) -> Result<SessionEnd> {
    let connect = TcpStream::connect((settings.server.host.as_str(), settings.server.port));
    let stream = tokio::select! {
        () = token.cancelled() => return Ok(SessionEnd::Cancelled),
        stream = connect => stream.with_context(|| format!("connect to {}", settings.server))?,
    };
    let (read, write) = stream.into_split();
    let mut reader = LineReader::new(BufReader::new(read));
    let mut writer = write;

    let mut nickname = settings.nickname.clone();
    if let Some(password) = settings.password.as_deref() {
        send(&mut writer, Command::Pass(password)).await?;
    }
    send(&mut writer, Command::Nick(&nickname)).await?;
    send(
        &mut writer,
        Command::User {
            username: &settings.nickname,
            realname: &settings.realname,
        },
    )
    .await?;

    let mut rejected = false;
    let ended = |rejected: bool| {
        if rejected {
            SessionEnd::Rejected
        } else {
            SessionEnd::Closed
        }
    };

    loop {
        let line = tokio::select! {
            () = token.cancelled() => {
                if let Err(err) = send(&mut writer, Command::Quit(QUIT_MESSAGE)).await {
                    tracing::debug!("QUIT not delivered: {err:#}");
                }
                return Ok(SessionEnd::Cancelled);
            }
            line = reader.next_line() => line.context("read from server")?,
        };
        let Some(line) = line else {
            return Ok(ended(rejected));
        };
        let Some(message) = Message::parse(&line) else {
            continue;
        };
        tracing::trace!("<< {}", line.trim_end());

        let Some(event) = Event::from_message(&message, &nickname) else {
            continue;
        };
        match event {
            Event::Ping(server) => send(&mut writer, Command::Pong(&server)).await?,
            Event::Welcome => {
                tracing::info!("registered as {nickname}");
                handler.on_welcome();
                send(&mut writer, Command::Join(&settings.channel)).await?;
            }
            Event::Joined { channel } => handler.on_join(&channel),
            Event::PubMsg {
                source,
                target,
                text,
            } => handler.on_pubmsg(&source, &target, &text),
            Event::PrivMsg {
                source,
                target,
                text,
            } => handler.on_privmsg(&source, &target, &text),
            Event::Action {
                source,
                target,
                text,
            } => handler.on_action(&source, &target, &text),
            Event::NickChanged { nickname: next } => nickname = next,
            Event::NicknameInUse => {
                nickname = handler.on_nickname_in_use(&nickname);
                send(&mut writer, Command::Nick(&nickname)).await?;
            }
            Event::PasswordRejected => {
                rejected = true;
                handler.on_password_rejected();
            }
            Event::ServerError(reason) => {
                tracing::info!("server closed the link: {reason}");
                return Ok(ended(rejected));
            }
        }
    }
}

/// Splits the server stream into lines, dropping any longer than
/// [`MAX_LINE`].
struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    overflow: bool,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            overflow: false,
        }
    }

    /// Next line including its terminator; `None` at end of stream. A
    /// final unterminated line is still returned.
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            self.buf.clear();
            let read = (&mut self.inner)
                .take(MAX_LINE)
                .read_until(b'\n', &mut self.buf)
                .await?;
            if read == 0 {
                return Ok(None);
            }

            let terminated = self.buf.ends_with(b"\n");
            if !terminated && read as u64 == MAX_LINE {
                if !self.overflow {
                    tracing::warn!("dropping server line longer than {MAX_LINE} bytes");
                }
                self.overflow = true;
                continue;
            }
            if std::mem::take(&mut self.overflow) {
                // tail of the dropped line
                continue;
            }
            return Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()));
        }
    }
}

async fn send(writer: &mut OwnedWriteHalf, command: Command<'_>) -> Result<()> {
    tracing::trace!(">> {}", command.name());
    writer
        .write_all(format!("{command}\r\n").as_bytes())
        .await
        .with_context(|| format!("send {}", command.name()))
}
