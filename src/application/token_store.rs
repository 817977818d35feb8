// Access token store abstraction
use tokio::sync::watch;

/// Holds the bearer token used for upstream calls.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    /// Replace the token; `None` clears it.
    fn set(&self, token: Option<String>);

    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}
