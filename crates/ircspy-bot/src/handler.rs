/// Callbacks the IRC client invokes as protocol events arrive.
///
/// `source` is the full `nick!user@host` prefix of the sender.
pub trait EventHandler: Send + Sync {
    /// Registration completed (numeric 001).
    fn on_welcome(&self);

    /// We joined `channel`.
    fn on_join(&self, channel: &str);

    fn on_pubmsg(&self, source: &str, target: &str, text: &str);

    fn on_privmsg(&self, source: &str, target: &str, text: &str);

    /// CTCP ACTION (`/me`), with the `ACTION` keyword stripped from `text`.
    fn on_action(&self, source: &str, target: &str, text: &str);

    /// The connection closed or failed.
    fn on_disconnect(&self);

    /// The server rejected the connection password (numeric 464).
    fn on_password_rejected(&self);

    /// `nickname` is taken. Returns the nickname to try next.
    fn on_nickname_in_use(&self, nickname: &str) -> String;
}
