//! State machine behind the portfolio's contact form.
//!
//! The controller owns the three input fields, tells the view whether the
//! submit button is enabled and performs at most one request per submission.
//! It is driven from a single task but may be shared (`&self` everywhere), so
//! a second `submit` racing the first is ignored instead of sending twice.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};
use whiteboard_extern_contracts::contact::{ContactApiError, ContactApiService};
use whiteboard_models::contact::{all_fields_present, ContactSubmission, ContactValidationError};

#[derive(Debug)]
pub struct ContactFormController<Api> {
    api: Api,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fields: ContactFields,
    state: FormState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Accepting input. Carries the error of the last failed submission.
    Editing { error: Option<ContactApiError> },
    Submitting,
    Submitted,
}

impl Default for FormState {
    fn default() -> Self {
        Self::Editing { error: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to do: fields incomplete, a request in flight or already sent.
    Ignored,
    Invalid(ContactValidationError),
    Sent,
    Failed(ContactApiError),
}

impl Inner {
    fn can_submit(&self) -> bool {
        matches!(self.state, FormState::Editing { .. })
            && all_fields_present(&self.fields.name, &self.fields.email, &self.fields.message)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a submission as in flight. Dropping it before [`InFlight::finish`]
/// (the `submit` future was cancelled) hands the form back to the user.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn start(inner: &'a Mutex<Inner>, guard: &mut Inner) -> Self {
        guard.state = FormState::Submitting;
        Self {
            inner,
            finished: false,
        }
    }

    fn finish(mut self) -> MutexGuard<'a, Inner> {
        self.finished = true;
        lock(self.inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!("Contact message submission was abandoned");
        let mut inner = lock(self.inner);
        if inner.state == FormState::Submitting {
            inner.state = FormState::Editing {
                error: Some(ContactApiError::Abandoned),
            };
        }
    }
}

impl<Api> ContactFormController<Api> {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            inner: Default::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    fn edit(&self, f: impl FnOnce(&mut ContactFields)) {
        let mut inner = self.lock();
        if inner.state != FormState::Submitted {
            f(&mut inner.fields);
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.edit(|fields| fields.name = name.into());
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.edit(|fields| fields.email = email.into());
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.edit(|fields| fields.message = message.into());
    }

    pub fn can_submit(&self) -> bool {
        self.lock().can_submit()
    }

    /// Whether the view should enable its submit button.
    pub fn is_submit_enabled(&self) -> bool {
        self.can_submit()
    }

    /// The verdict the relay would give for the current fields.
    pub fn validation(&self) -> Result<(), ContactValidationError> {
        let inner = self.lock();
        let ContactFields {
            name,
            email,
            message,
        } = &inner.fields;
        ContactSubmission::parse(name, email, message).map(|_| ())
    }

    pub fn state(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn fields(&self) -> ContactFields {
        self.lock().fields.clone()
    }
}

impl<Api> ContactFormController<Api>
where
    Api: ContactApiService,
{
    pub async fn submit(&self) -> SubmitOutcome {
        let (submission, in_flight) = {
            let mut inner = self.lock();
            if !inner.can_submit() {
                return SubmitOutcome::Ignored;
            }

            let ContactFields {
                name,
                email,
                message,
            } = &inner.fields;
            match ContactSubmission::parse(name, email, message) {
                Ok(submission) => (submission, InFlight::start(&self.inner, &mut inner)),
                Err(err) => return SubmitOutcome::Invalid(err),
            }
        };

        let result = self.api.send_message(submission).await;

        let mut inner = in_flight.finish();
        match result {
            Ok(()) => {
                info!("Contact message sent");
                inner.state = FormState::Submitted;
                inner.fields = ContactFields::default();
                SubmitOutcome::Sent
            }
            Err(err) => {
                warn!("Failed to send contact message: {err}");
                inner.state = FormState::Editing {
                    error: Some(err.clone()),
                };
                SubmitOutcome::Failed(err)
            }
        }
    }
}
