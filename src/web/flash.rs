use crate::core::{Result, UserId, UserMessage};
use std::collections::HashMap;
use std::sync::Mutex;

/// Messages carried over a redirect, shown once on the next screen
#[derive(Debug, Default)]
pub struct FlashMessages {
    pending: Mutex<HashMap<UserId, Vec<UserMessage>>>,
}

impl FlashMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, user: UserId, messages: Vec<UserMessage>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }
        self.pending
            .lock()?
            .entry(user)
            .or_default()
            .extend(messages);
        Ok(())
    }

    /// Removes and returns everything queued for `user`
    pub fn take(&self, user: UserId) -> Result<Vec<UserMessage>> {
        Ok(self.pending.lock()?.remove(&user).unwrap_or_default())
    }
}
