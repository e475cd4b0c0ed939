use std::time::{Duration, Instant};

use crate::{ContactDispatcher, ContactTransport};

/// How long the "message sent" confirmation stays visible.
pub const SENT_CONFIRMATION_DURATION: Duration = Duration::from_secs(4);

/// State behind the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    is_submitting: bool,
    error: Option<String>,
    sent_until: Option<Instant>,
}

/// A snapshot of the field values taken when a submission starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Whether a submission is in flight. The submit control is disabled
    /// while this is set.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the "message sent" confirmation is showing.
    pub fn is_sent(&self) -> bool {
        self.sent_until.is_some()
    }

    /// Start a submission. Returns `None` if one is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if self.is_submitting {
            return None;
        }

        self.is_submitting = true;
        self.error = None;

        Some(PendingSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }

    /// Record the outcome of the submission started by [`Self::begin_submit`].
    /// Success clears the fields and shows the confirmation, failure keeps the
    /// fields and shows the error text.
    pub fn finish_submit<E: std::fmt::Display>(&mut self, result: Result<(), E>, now: Instant) {
        self.is_submitting = false;

        match result {
            Ok(()) => {
                self.name.clear();
                self.email.clear();
                self.message.clear();
                self.sent_until = Some(now + SENT_CONFIRMATION_DURATION);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Run a complete submission through `dispatcher`.
    pub async fn submit<Transport: ContactTransport>(
        &mut self,
        dispatcher: &ContactDispatcher<Transport>,
    ) {
        let Some(pending) = self.begin_submit() else {
            return;
        };

        let result = dispatcher
            .dispatch(&pending.name, &pending.email, &pending.message)
            .await;

        self.finish_submit(result, Instant::now());
    }

    /// Hide the confirmation once it has been shown long enough.
    pub fn refresh(&mut self, now: Instant) {
        if self.sent_until.is_some_and(|until| now >= until) {
            self.sent_until = None;
        }
    }
}
