//! User-facing feedback queued by a save pass

use crate::core::{Severity, UserMessage};

pub const MISSING_REQUIRED: &str = "Some required fields are missing. Please fill them in.";
pub const UPDATE_FAILED: &str = "There was a problem updating the group profile fields.";
pub const UPDATE_SUCCEEDED: &str = "Profile updated successfully.";

/// Where feedback for the current user goes
pub trait MessageQueue {
    fn add_user_message(&mut self, text: &str, severity: Severity);
}

impl MessageQueue for Vec<UserMessage> {
    fn add_user_message(&mut self, text: &str, severity: Severity) {
        self.push(UserMessage::new(text, severity));
    }
}
