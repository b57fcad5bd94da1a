use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 6667;

/// A `host[:port]` server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddrParseError {
    MissingHost,
    Port(String),
}

impl fmt::Display for AddrParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHost => write!(f, "Missing server host"),
            Self::Port(port) => write!(f, "Erroneous port '{port}'"),
        }
    }
}

impl std::error::Error for AddrParseError {}

impl FromStr for ServerAddr {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = match s.split_once(':') {
            Some((host, port)) => (
                host,
                port.parse()
                    .map_err(|_| AddrParseError::Port(port.to_string()))?,
            ),
            None => (s, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(AddrParseError::MissingHost);
        }
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
