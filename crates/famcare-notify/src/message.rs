//! Notification wording.
//!
//! The subject of a reminder and the account holder watching over them get
//! distinctly worded messages for the same fire.

/// A rendered notification: subject line plus plain-text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    /// Message subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Message addressed to the person the reminder concerns
pub fn for_subject(title: &str, notes: Option<&str>) -> ReminderMessage {
    ReminderMessage {
        subject: format!("Reminder: {title}"),
        body: format!(
            "Hello! You have a reminder for {title}.\nNotes: {}",
            notes_text(notes)
        ),
    }
}

/// Message addressed to the account holder about their family member
pub fn for_guardian(title: &str, notes: Option<&str>) -> ReminderMessage {
    ReminderMessage {
        subject: format!("Reminder Notification: {title}"),
        body: format!(
            "Reminder for your family member: {title}.\nNotes: {}",
            notes_text(notes)
        ),
    }
}

fn notes_text(notes: Option<&str>) -> &str {
    match notes {
        Some(n) if !n.trim().is_empty() => n,
        _ => "None",
    }
}
