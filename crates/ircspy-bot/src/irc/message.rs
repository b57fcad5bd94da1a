//! IRC line parsing and the events ircspy cares about.

use std::fmt;

const CTCP_DELIM: char = '\x01';
const CHANNEL_PREFIXES: &[char] = &['#', '&', '+', '!'];

/// One parsed server line: `[@tags] [:prefix] COMMAND params… [:trailing]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl Message {
    /// Parses a single line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        // IRCv3 message tags are not used.
        if rest.starts_with('@') {
            rest = rest.split_once(' ').map_or("", |(_, rest)| rest);
        }
        rest = rest.trim_start_matches(' ');

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, remainder) = stripped.split_once(' ').unwrap_or((stripped, ""));
                rest = remainder;
                Some(prefix.to_string())
            }
            None => None,
        };

        rest = rest.trim_start_matches(' ');
        let (command, mut rest) = rest.split_once(' ').unwrap_or((rest, ""));
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            let (param, remainder) = rest.split_once(' ').unwrap_or((rest, ""));
            params.push(param.to_string());
            rest = remainder;
        }

        Some(Self {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Nickname portion of the prefix.
    pub fn source_nick(&self) -> Option<&str> {
        self.prefix.as_deref().map(nick_of)
    }
}

/// Returns the nickname part of a `nick!user@host` source.
pub fn nick_of(source: &str) -> &str {
    source.split_once('!').map_or(source, |(nick, _)| nick)
}

/// What a server line means to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ping(String),
    Welcome,
    Joined { channel: String },
    PubMsg { source: String, target: String, text: String },
    PrivMsg { source: String, target: String, text: String },
    Action { source: String, target: String, text: String },
    NickChanged { nickname: String },
    NicknameInUse,
    PasswordRejected,
    ServerError(String),
}

impl Event {
    /// Classifies `message` from the point of view of a client currently
    /// named `nickname`. Lines with no meaning for the display yield `None`.
    pub fn from_message(message: &Message, nickname: &str) -> Option<Self> {
        let is_self = || {
            message
                .source_nick()
                .is_some_and(|nick| nick.eq_ignore_ascii_case(nickname))
        };

        match message.command.as_str() {
            "PING" => Some(Self::Ping(message.param(0).unwrap_or_default().to_string())),
            "001" => Some(Self::Welcome),
            "433" => Some(Self::NicknameInUse),
            "464" => Some(Self::PasswordRejected),
            "ERROR" => Some(Self::ServerError(
                message.param(0).unwrap_or_default().to_string(),
            )),
            "JOIN" if is_self() => message.param(0).map(|channel| Self::Joined {
                channel: channel.to_string(),
            }),
            "NICK" if is_self() => message.param(0).map(|nickname| Self::NickChanged {
                nickname: nickname.to_string(),
            }),
            "PRIVMSG" => privmsg(message),
            _ => None,
        }
    }
}

fn privmsg(message: &Message) -> Option<Event> {
    let source = message.prefix.clone().unwrap_or_default();
    let target = message.param(0)?.to_string();
    let text = message.param(1).unwrap_or_default();

    if let Some(ctcp) = text.strip_prefix(CTCP_DELIM) {
        let ctcp = ctcp.strip_suffix(CTCP_DELIM).unwrap_or(ctcp);
        let (kind, body) = ctcp.split_once(' ').unwrap_or((ctcp, ""));
        // Other CTCP requests (VERSION, PING, DCC…) are not shown.
        return kind.eq_ignore_ascii_case("ACTION").then(|| Event::Action {
            source,
            target,
            text: body.to_string(),
        });
    }

    let text = text.to_string();
    if target.starts_with(CHANNEL_PREFIXES) {
        Some(Event::PubMsg {
            source,
            target,
            text,
        })
    } else {
        Some(Event::PrivMsg {
            source,
            target,
            text,
        })
    }
}

/// Client-to-server commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Pass(&'a str),
    Nick(&'a str),
    User { username: &'a str, realname: &'a str },
    Join(&'a str),
    Pong(&'a str),
    Quit(&'a str),
}

impl Command<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pass(_) => "PASS",
            Self::Nick(_) => "NICK",
            Self::User { .. } => "USER",
            Self::Join(_) => "JOIN",
            Self::Pong(_) => "PONG",
            Self::Quit(_) => "QUIT",
        }
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(password) => write!(f, "PASS {password}"),
            Self::Nick(nickname) => write!(f, "NICK {nickname}"),
            Self::User { username, realname } => write!(f, "USER {username} 0 * :{realname}"),
            Self::Join(channel) => write!(f, "JOIN {channel}"),
            Self::Pong(token) => write!(f, "PONG :{token}"),
            Self::Quit(reason) => write!(f, "QUIT :{reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(line: &str) -> Option<Event> {
        Event::from_message(&Message::parse(line).unwrap(), "spy")
    }

    #[test]
    fn test_parse_prefix_command_and_trailing() {
        let message = Message::parse(":alice!user@host PRIVMSG #room :hello there\r\n").unwrap();
        assert_eq!(message.prefix.as_deref(), Some("alice!user@host"));
        assert_eq!(message.command, "PRIVMSG");
        assert_eq!(message.params, vec!["#room", "hello there"]);
        assert_eq!(message.source_nick(), Some("alice"));
    }

    #[test]
    fn test_nick_of_strips_user_and_host() {
        assert_eq!(nick_of("alice!user@host"), "alice");
        assert_eq!(nick_of("irc.example.net"), "irc.example.net");
        assert_eq!(nick_of(""), "");
    }

    #[test]
    fn test_parse_without_prefix() {
        let message = Message::parse("PING :irc.example.net").unwrap();
        assert_eq!(message.prefix, None);
        assert_eq!(message.command, "PING");
        assert_eq!(message.param(0), Some("irc.example.net"));
    }

    #[test]
    fn test_parse_middle_params_and_tags() {
        let message =
            Message::parse("@time=2024-01-01T00:00:00Z :srv 433 * spy :Nickname is already in use")
                .unwrap();
        assert_eq!(message.prefix.as_deref(), Some("srv"));
        assert_eq!(message.command, "433");
        assert_eq!(
            message.params,
            vec!["*", "spy", "Nickname is already in use"]
        );
    }

    #[test]
    fn test_parse_empty_trailing_and_blank_lines() {
        let message = Message::parse(":a!b@c PRIVMSG #room :").unwrap();
        assert_eq!(message.params, vec!["#room", ""]);
        assert_eq!(Message::parse(""), None);
        assert_eq!(Message::parse("\r\n"), None);
    }

    #[test]
    fn test_channel_and_private_messages() {
        assert_eq!(
            event(":alice!user@host PRIVMSG #room :hi"),
            Some(Event::PubMsg {
                source: "alice!user@host".to_string(),
                target: "#room".to_string(),
                text: "hi".to_string(),
            })
        );
        assert_eq!(
            event(":bob!b@h PRIVMSG spy :psst"),
            Some(Event::PrivMsg {
                source: "bob!b@h".to_string(),
                target: "spy".to_string(),
                text: "psst".to_string(),
            })
        );
    }

    #[test]
    fn test_ctcp_action_is_unwrapped() {
        assert_eq!(
            event(":alice!user@host PRIVMSG #room :\x01ACTION waves hello\x01"),
            Some(Event::Action {
                source: "alice!user@host".to_string(),
                target: "#room".to_string(),
                text: "waves hello".to_string(),
            })
        );
    }

    #[test]
    fn test_other_ctcp_is_ignored() {
        assert_eq!(event(":alice!u@h PRIVMSG spy :\x01VERSION\x01"), None);
    }

    #[test]
    fn test_join_only_counts_for_own_nick() {
        assert_eq!(
            event(":Spy!~spy@host JOIN :#room"),
            Some(Event::Joined {
                channel: "#room".to_string()
            })
        );
        assert_eq!(event(":alice!user@host JOIN #room"), None);
    }

    #[test]
    fn test_numerics_and_control_lines() {
        assert_eq!(event(":srv 001 spy :Welcome"), Some(Event::Welcome));
        assert_eq!(event(":srv 464 * :Password incorrect"), Some(Event::PasswordRejected));
        assert_eq!(event("PING :abc"), Some(Event::Ping("abc".to_string())));
        assert_eq!(
            event("ERROR :Closing Link"),
            Some(Event::ServerError("Closing Link".to_string()))
        );
        assert_eq!(event(":srv 372 spy :- motd"), None);
    }

    #[test]
    fn test_command_lines() {
        assert_eq!(Command::Nick("spy_").to_string(), "NICK spy_");
        assert_eq!(
            Command::User {
                username: "spy",
                realname: "IRC Spy"
            }
            .to_string(),
            "USER spy 0 * :IRC Spy"
        );
        assert_eq!(Command::Pong("abc").to_string(), "PONG :abc");
        assert_eq!(Command::Pass("secret").name(), "PASS");
    }
}
