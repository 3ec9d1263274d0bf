use ridebook_account::{LoginForm, RegistrationForm};
use ridebook_core::validation::validate_required;

use crate::error::AppError;
use crate::view::{FormView, Page, PasswordMeter};
use crate::App;

impl App {
    /// Registration form submit. Success sends the user to the login page.
    pub async fn register(&self, form: &RegistrationForm) -> FormView {
        match self.state.accounts.register(form).await {
            Ok(_) => FormView::new()
                .with_alert("Registration successful! Redirecting to login...")
                .with_redirect(Page::Login),
            Err(e) => AppError::from(e).into_view(),
        }
    }

    /// Login form submit. Success sends the user to the booking page.
    pub async fn login(&self, form: &LoginForm) -> FormView {
        match self.state.accounts.login(form).await {
            Ok(_) => FormView::new()
                .with_alert("Login successful!")
                .with_redirect(Page::Booking),
            Err(e) => AppError::from(e).into_view(),
        }
    }

    pub fn password_meter(&self, password: &str) -> PasswordMeter {
        self.state.accounts.password_strength(password).into()
    }

    /// Blur check for a required input, keyed by its form group.
    pub fn check_required(&self, field: &str, label: &str, value: &str) -> FormView {
        let mut view = FormView::new();
        if let Some(message) = validate_required(label, value) {
            view.field_errors.insert(field.to_string(), message);
        }
        view
    }

    /// Social sign-in buttons are placeholders.
    pub fn social_login(&self, provider: &str) -> FormView {
        FormView::new().with_alert(format!(
            "{} authentication would be integrated here in production.",
            provider
        ))
    }
}
