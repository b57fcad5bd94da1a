//! Drives the bot against a scripted IRC server on localhost.

use std::sync::Arc;
use std::time::Duration;

use ircspy_bot::{IrcSettings, ServerAddr};
use ircspy_core::display::{DisplayState, Pauses};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const TIMEOUT: Duration = Duration::from_secs(5);

struct Peer {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Peer {
    async fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = tokio::time::timeout(TIMEOUT, listener.accept())
            .await
            .expect("bot did not connect")
            .unwrap();
        Self::new(stream)
    }

    fn new(stream: TcpStream) -> Self {
        let (read, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read).lines(),
            writer,
        }
    }

    async fn expect(&mut self, expected: &str) {
        let line = tokio::time::timeout(TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for client line")
            .unwrap()
            .expect("client closed the connection");
        assert_eq!(line, expected);
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await
            .unwrap();
    }

    /// Round-trips a PING so every earlier line has been handled.
    async fn sync(&mut self, token: &str) {
        self.send(&format!("PING :{token}")).await;
        self.expect(&format!("PONG :{token}")).await;
    }
}

struct Harness {
    listener: TcpListener,
    state: Arc<DisplayState>,
    token: CancellationToken,
    bot: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    async fn start(password: Option<&str>, reconnect_delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(DisplayState::new(Pauses::default()));
        let token = CancellationToken::new();

        let settings = IrcSettings {
            server: ServerAddr {
                host: "127.0.0.1".to_string(),
                port,
            },
            channel: "#room".to_string(),
            nickname: "spy".to_string(),
            password: password.map(str::to_string),
            realname: "IRC Spy".to_string(),
            reconnect_delay,
        };
        let bot = tokio::spawn(ircspy_bot::run(
            settings,
            Arc::clone(&state),
            token.clone(),
        ));

        Self {
            listener,
            state,
            token,
            bot,
        }
    }

    async fn accept(&self) -> Peer {
        Peer::accept(&self.listener).await
    }

    fn lines(&self) -> (String, String) {
        self.state.lines()
    }

    async fn wait_for(&self, line1: &str, line2: &str) {
        let expected = (line1.to_string(), line2.to_string());
        let waited = tokio::time::timeout(TIMEOUT, async {
            while self.lines() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "display stuck at {:?}", self.lines());
    }

    async fn shutdown(self) {
        self.token.cancel();
        tokio::time::timeout(TIMEOUT, self.bot)
            .await
            .expect("bot did not stop")
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn test_channel_session_updates_display() {
    let harness = Harness::start(None, Duration::from_secs(60)).await;
    let mut server = harness.accept().await;

    server.expect("NICK spy").await;
    server.expect("USER spy 0 * :IRC Spy").await;

    server
        .send(":irc.test 433 * spy :Nickname is already in use")
        .await;
    server.expect("NICK spy_").await;
    assert_eq!(harness.lines().0, "IRC Spy: INIT");

    server.send(":irc.test 001 spy_ :Welcome to the test net").await;
    server.expect("JOIN #room").await;
    assert_eq!(
        harness.lines(),
        ("IRC Spy: Connect".to_string(), "Joining...".to_string())
    );

    server.send(":spy_!~spy@localhost JOIN :#room").await;
    server.sync("1").await;
    assert_eq!(
        harness.lines(),
        ("IRC Spy: Joined".to_string(), "#room".to_string())
    );

    server.send(":alice!user@host PRIVMSG #room :hi").await;
    server.sync("2").await;
    let snapshot = harness.state.snapshot();
    assert_eq!(snapshot.line1.window(), "alice>#room     ");
    assert_eq!(snapshot.line2.window(), "hi              ");

    server
        .send(":alice!user@host PRIVMSG #room :\x01ACTION waves\x01")
        .await;
    server.sync("3").await;
    assert_eq!(
        harness.lines(),
        ("*ACTION>#room".to_string(), "alice waves".to_string())
    );

    drop(server);
    harness.wait_for("ERROR:", "Disconnected").await;

    harness.shutdown().await;
}

#[tokio::test]
async fn test_rejected_password_stays_on_display() {
    let harness = Harness::start(Some("hunter2"), Duration::from_millis(50)).await;
    let mut server = harness.accept().await;

    server.expect("PASS hunter2").await;
    server.expect("NICK spy").await;
    server.expect("USER spy 0 * :IRC Spy").await;
    server.send(":irc.test 464 spy :Password incorrect").await;
    server
        .send("ERROR :Closing Link: localhost (Bad Password)")
        .await;

    // The reconnect proves the first session has been fully handled.
    let mut retry = harness.accept().await;
    retry.expect("PASS hunter2").await;
    assert_eq!(
        harness.lines(),
        ("ERROR:".to_string(), "Bad Password".to_string())
    );

    drop(server);
    harness.shutdown().await;
}

#[tokio::test]
async fn test_cancel_sends_quit() {
    let harness = Harness::start(None, Duration::from_secs(60)).await;
    let mut server = harness.accept().await;
    server.expect("NICK spy").await;
    server.expect("USER spy 0 * :IRC Spy").await;

    harness.token.cancel();
    server.expect("QUIT :ircspy shutting down").await;

    harness.shutdown().await;
}

#[tokio::test]
async fn test_overlong_line_does_not_end_session() {
    let harness = Harness::start(None, Duration::from_secs(60)).await;
    let mut server = harness.accept().await;
    server.expect("NICK spy").await;
    server.expect("USER spy 0 * :IRC Spy").await;

    let flood = format!(":alice!user@host PRIVMSG #room :{}", "x".repeat(20_000));
    server.send(&flood).await;
    server.sync("after-flood").await;
    assert_eq!(harness.lines().0, "IRC Spy: INIT");

    server.send(":alice!user@host PRIVMSG #room :still here").await;
    server.sync("2").await;
    assert_eq!(
        harness.lines(),
        ("alice>#room".to_string(), "still here".to_string())
    );

    harness.shutdown().await;
}
