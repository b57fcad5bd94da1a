//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ircspy_bot::ServerAddr;
use ircspy_core::config::{self, Config};
use ircspy_core::logging::{self, LogTarget};

mod spy;

#[derive(Parser)]
#[command(name = "ircspy")]
#[command(version)]
#[command(about = "Mirror an IRC channel onto a scrolling two-line display")]
struct Cli {
    /// IRC server, optionally with a port (default 6667)
    #[arg(value_name = "SERVER[:PORT]")]
    server: ServerAddr,

    /// Channel to join
    channel: String,

    /// Nickname to use
    nickname: String,

    /// Server password
    password: Option<String>,

    /// Where frames are drawn
    #[arg(long, value_enum, default_value_t = SinkKind::Terminal)]
    sink: SinkKind,

    /// Milliseconds between display refreshes (overrides config)
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Ticks to hold the first window of a scrolling line (overrides config)
    #[arg(long, value_name = "TICKS")]
    start_pause: Option<u16>,

    /// Ticks to hold the last window of a scrolling line (overrides config)
    #[arg(long, value_name = "TICKS")]
    end_pause: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// Draw in the top-left corner of this terminal
    Terminal,
    /// Log each new frame (headless)
    Log,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(tick_ms) = self.tick_ms {
            config.display.tick_ms = tick_ms;
        }
        if let Some(start_pause) = self.start_pause {
            config.display.start_pause = start_pause;
        }
        if let Some(end_pause) = self.end_pause {
            config.display.end_pause = end_pause;
        }
    }

    fn log_target(&self) -> LogTarget {
        match self.sink {
            SinkKind::Terminal => LogTarget::File(config::paths::logs_dir()),
            SinkKind::Log => LogTarget::Stderr,
        }
    }
}

/// Parses arguments. Usage errors exit with status 1; `--help` and
/// `--version` exit with 0.
fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            // Printing can only fail if stderr is gone; exit either way.
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    }
}

pub fn run() -> Result<()> {
    let cli = parse_args();

    let mut config = Config::load().context("load config")?;
    cli.apply_overrides(&mut config);

    let _log_guard = logging::init(&cli.log_target()).context("initialize logging")?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { spy::run(cli, config).await })
}
