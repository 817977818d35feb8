// In-memory access token store
use crate::application::token_store::TokenStore;
use tokio::sync::watch;

#[derive(Debug)]
pub struct InMemoryTokenStore {
    token: watch::Sender<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new(initial: Option<String>) -> Self {
        let (token, _) = watch::channel(initial.filter(|t| !t.is_empty()));
        Self { token }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: Option<String>) {
        self.token.send_replace(token.filter(|t| !t.is_empty()));
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}
