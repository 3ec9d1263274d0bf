use ridebook_booking::{BookingSummary, FareEngine, RouteInfo, StepIndicator, WizardState, WizardStep};
use ridebook_core::{PasswordStrength, ValidationErrors};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where the page layer should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Login,
    Booking,
}

/// Everything the page layer needs to redraw a form after a command.
///
/// Form groups missing from `field_errors` should have their error cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub field_errors: BTreeMap<String, String>,
    /// Blocking message box
    pub alert: Option<String>,
    pub visible_step: Option<u8>,
    pub steps: Vec<StepIndicator>,
    /// Distance / duration / fare cards next to the map
    pub map: Option<RouteInfo>,
    pub summary: Option<BookingSummary>,
    pub confirmation_id: Option<String>,
    pub redirect: Option<Page>,
}

impl FormView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_errors(errors: &ValidationErrors) -> Self {
        let mut view = Self::new();
        view.add_errors(errors);
        view
    }

    /// Render the wizard: visible step, indicators, map cards, and the
    /// summary/confirmation once those steps are reached.
    pub fn for_wizard(state: &WizardState, fares: &FareEngine) -> Self {
        let summary = if state.step >= WizardStep::Summary {
            BookingSummary::from_draft(&state.draft, fares)
        } else {
            None
        };

        Self {
            visible_step: Some(state.step.number()),
            steps: state.indicators(),
            map: state.route.clone(),
            summary,
            confirmation_id: state.draft.booking_id.as_ref().map(|id| id.to_string()),
            ..Self::default()
        }
    }

    pub fn add_errors(&mut self, errors: &ValidationErrors) {
        for error in errors.iter() {
            self.field_errors
                .entry(error.field.clone())
                .or_insert_with(|| error.message.clone());
        }
    }

    pub fn with_alert(mut self, message: impl Into<String>) -> Self {
        self.alert = Some(message.into());
        self
    }

    pub fn with_redirect(mut self, page: Page) -> Self {
        self.redirect = Some(page);
        self
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Overlay another view's errors and alert onto this one.
    pub fn merge(mut self, other: FormView) -> Self {
        for (field, message) in other.field_errors {
            self.field_errors.entry(field).or_insert(message);
        }
        if other.alert.is_some() {
            self.alert = other.alert;
        }
        if other.redirect.is_some() {
            self.redirect = other.redirect;
        }
        self
    }
}

/// Password strength bar under the registration password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordMeter {
    pub strength: PasswordStrength,
    pub label: &'static str,
}

impl From<PasswordStrength> for PasswordMeter {
    fn from(strength: PasswordStrength) -> Self {
        Self {
            strength,
            label: strength.label(),
        }
    }
}
