// ── Contact form ──
//
// Field values, validation and the submit lifecycle
// `Idle → Submitting → Sent | Failed`. Delivery itself goes through
// `MessageSender`; the form only records the outcome. A failed send keeps
// every field so the visitor can retry.

mod emailjs;

use std::future::Future;

use tracing::{debug, warn};

use crate::error::CoreError;

/// Shortest message body accepted.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Template value used when no company is given.
pub const COMPANY_PLACEHOLDER: &str = "No especificada";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
    Company,
}

impl ContactField {
    pub fn is_required(self) -> bool {
        !matches!(self, Self::Company)
    }

    /// Stable field name, as reported in `CoreError::Validation`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
            Self::Company => "company",
        }
    }
}

/// What a visitor typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub company: String,
}

impl ContactMessage {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
            ContactField::Company => &self.company,
        }
    }

    fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
            ContactField::Company => &mut self.company,
        }
    }

    /// Company, or the placeholder when left blank.
    pub fn company_or_placeholder(&self) -> &str {
        let company = self.company.trim();
        if company.is_empty() {
            COMPANY_PLACEHOLDER
        } else {
            company
        }
    }

    /// First problem found, in field order.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every problem, one per offending field.
    pub fn problems(&self) -> Vec<CoreError> {
        let mut problems = Vec::new();
        for field in [
            ContactField::Name,
            ContactField::Email,
            ContactField::Subject,
            ContactField::Message,
        ] {
            if self.get(field).trim().is_empty() {
                problems.push(invalid(field, "is required"));
                continue;
            }
            match field {
                ContactField::Email if !is_email(self.email.trim()) => {
                    problems.push(invalid(field, "must look like name@domain.tld"));
                }
                ContactField::Message if self.message.trim().chars().count() < MIN_MESSAGE_CHARS => {
                    problems.push(invalid(
                        field,
                        format!("must be at least {MIN_MESSAGE_CHARS} characters"),
                    ));
                }
                _ => {}
            }
        }
        problems
    }
}

fn invalid(field: ContactField, reason: impl Into<String>) -> CoreError {
    CoreError::Validation {
        field: field.key(),
        reason: reason.into(),
    }
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

// ── Delivery seam ───────────────────────────────────────────────────

/// Something that can deliver a validated contact message.
pub trait MessageSender: Send + Sync {
    fn send(&self, message: &ContactMessage) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── Form state machine ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Sent,
    /// Delivery failed; the reason is shown and the fields are kept.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    message: ContactMessage,
    status: FormStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &ContactMessage {
        &self.message
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == FormStatus::Submitting
    }

    /// Replace a field. Ignored while a send is in flight.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        if self.edit_blocked() {
            return;
        }
        *self.message.get_mut(field) = value.into();
    }

    pub fn push_char(&mut self, field: ContactField, c: char) {
        if self.edit_blocked() {
            return;
        }
        self.message.get_mut(field).push(c);
    }

    pub fn pop_char(&mut self, field: ContactField) {
        if self.edit_blocked() {
            return;
        }
        self.message.get_mut(field).pop();
    }

    /// Validate and enter `Submitting`. Returns the message to deliver.
    pub fn begin_submit(&mut self) -> Result<ContactMessage, CoreError> {
        if self.is_submitting() {
            return Err(CoreError::SubmissionInProgress);
        }
        self.message.validate()?;
        self.status = FormStatus::Submitting;
        debug!("contact form submitting");
        Ok(self.message.clone())
    }

    /// Record the delivery outcome. Ignored unless a send is in flight.
    pub fn finish(&mut self, outcome: &Result<(), CoreError>) {
        if !self.is_submitting() {
            return;
        }
        self.status = match outcome {
            Ok(()) => {
                debug!("contact form sent");
                FormStatus::Sent
            }
            Err(err) => {
                warn!(error = %err, "contact form delivery failed");
                FormStatus::Failed(err.to_string())
            }
        };
    }

    /// Clear every field and return to `Idle`. Ignored while submitting.
    pub fn reset(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.message = ContactMessage::default();
        self.status = FormStatus::Idle;
    }

    /// Editing after an outcome returns the form to `Idle`.
    fn edit_blocked(&mut self) -> bool {
        match self.status {
            FormStatus::Submitting => true,
            FormStatus::Sent | FormStatus::Failed(_) => {
                self.status = FormStatus::Idle;
                false
            }
            FormStatus::Idle => false,
        }
    }
}

/// Drive one full submit: validate, deliver, record.
pub async fn submit<S: MessageSender>(form: &mut ContactForm, sender: &S) -> Result<(), CoreError> {
    let message = form.begin_submit()?;
    let outcome = sender.send(&message).await;
    form.finish(&outcome);
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.set_field(ContactField::Name, "Ada Lovelace");
        form.set_field(ContactField::Email, "ada@example.com");
        form.set_field(ContactField::Subject, "Hola");
        form.set_field(ContactField::Message, "Me interesa el curso completo.");
        form
    }

    struct Outcome(Option<u16>);

    impl MessageSender for Outcome {
        async fn send(&self, _message: &ContactMessage) -> Result<(), CoreError> {
            match self.0 {
                None => Ok(()),
                Some(status) => Err(CoreError::Delivery {
                    message: "boom".into(),
                    status: Some(status),
                }),
            }
        }
    }

    #[test]
    fn blank_required_fields_reported_in_order() {
        let problems = ContactMessage::default().problems();
        let fields: Vec<_> = problems
            .iter()
            .map(|p| match p {
                CoreError::Validation { field, .. } => *field,
                _ => "",
            })
            .collect();
        assert_eq!(fields, vec!["name", "email", "subject", "message"]);
    }

    #[test]
    fn email_shape() {
        for good in ["a@b.co", "first.last@sub.example.org"] {
            assert!(is_email(good), "{good}");
        }
        for bad in ["plain", "@example.com", "a@b", "a@.com", "a@b.", "a b@c.d", "a@b@c.d", "a@b..c"] {
            assert!(!is_email(bad), "{bad}");
        }
    }

    #[test]
    fn short_message_rejected() {
        let mut form = filled();
        form.set_field(ContactField::Message, "  corto  ");
        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "message", .. }));
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn company_placeholder() {
        let mut form = filled();
        assert_eq!(form.message().company_or_placeholder(), "No especificada");
        form.set_field(ContactField::Company, " Acme ");
        assert_eq!(form.message().company_or_placeholder(), "Acme");
    }

    #[test]
    fn second_submit_while_in_flight_rejected() {
        let mut form = filled();
        form.begin_submit().unwrap();
        assert!(matches!(
            form.begin_submit(),
            Err(CoreError::SubmissionInProgress)
        ));
    }

    #[test]
    fn edits_ignored_while_submitting() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.push_char(ContactField::Name, '!');
        form.reset();
        assert_eq!(form.message().name, "Ada Lovelace");
    }

    #[test]
    fn failure_keeps_fields_and_allows_retry() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish(&Err(CoreError::Delivery {
            message: "down".into(),
            status: Some(503),
        }));
        assert!(matches!(form.status(), FormStatus::Failed(reason) if reason.contains("down")));
        assert_eq!(form.message().email, "ada@example.com");
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn reset_after_send_clears_everything() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish(&Ok(()));
        assert_eq!(form.status(), &FormStatus::Sent);
        form.reset();
        assert_eq!(form.message(), &ContactMessage::default());
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn finish_without_submit_is_ignored() {
        let mut form = filled();
        form.finish(&Ok(()));
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn editing_after_failure_returns_to_idle() {
        let mut form = filled();
        form.begin_submit().unwrap();
        form.finish(&Err(CoreError::SubmissionInProgress));
        form.pop_char(ContactField::Subject);
        assert_eq!(form.status(), &FormStatus::Idle);
        assert_eq!(form.message().subject, "Hol");
    }

    #[tokio::test]
    async fn submit_records_success() {
        let mut form = filled();
        submit(&mut form, &Outcome(None)).await.unwrap();
        assert_eq!(form.status(), &FormStatus::Sent);
    }

    #[tokio::test]
    async fn submit_records_failure_with_status() {
        let mut form = filled();
        let err = submit(&mut form, &Outcome(Some(502))).await.unwrap_err();
        assert!(matches!(err, CoreError::Delivery { status: Some(502), .. }));
        assert!(matches!(form.status(), FormStatus::Failed(_)));
    }
}
