use ridebook_account::models::fields as account_fields;
use ridebook_account::AccountError;
use ridebook_booking::{BookingError, RouteError, StepError};
use ridebook_store::StoreError;

use crate::view::FormView;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StepError> for AppError {
    fn from(err: StepError) -> Self {
        AppError::Booking(BookingError::Step(err))
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        AppError::Booking(BookingError::Route(err))
    }
}

impl AppError {
    /// What the user sees for this failure.
    pub fn into_view(self) -> FormView {
        match self {
            AppError::Account(AccountError::Validation(errors)) => FormView::from_errors(&errors),
            AppError::Account(AccountError::InvalidCredentials) => {
                let mut view = FormView::new();
                view.field_errors.insert(
                    account_fields::LOGIN_PASSWORD.to_string(),
                    AccountError::InvalidCredentials.to_string(),
                );
                view
            }
            AppError::Account(AccountError::Storage(e)) | AppError::Store(e) => {
                tracing::error!("Storage failure: {}", e);
                FormView::new().with_alert(GENERIC_FAILURE)
            }
            AppError::Booking(BookingError::Step(step)) => step_view(step),
            AppError::Booking(BookingError::Route(route)) => route_view(route),
            AppError::Booking(BookingError::Storage(e)) => {
                tracing::error!("Booking could not be stored: {}", e);
                FormView::new().with_alert(GENERIC_FAILURE)
            }
            AppError::Booking(BookingError::Autocomplete(e)) => {
                tracing::warn!("Place lookup failed: {}", e);
                FormView::new().with_alert("Unable to look up places right now.")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                FormView::new().with_alert(GENERIC_FAILURE)
            }
        }
    }
}

fn step_view(err: StepError) -> FormView {
    match err {
        StepError::Validation(errors) => FormView::from_errors(&errors),
        StepError::RoutePending => FormView::new().with_alert(StepError::RoutePending.to_string()),
        StepError::InvalidTransition { from, to } => {
            tracing::warn!("Ignored wizard command: {} -> {}", from, to);
            FormView::new()
        }
    }
}

fn route_view(err: RouteError) -> FormView {
    if err.is_user_facing() {
        FormView::new().with_alert(err.to_string())
    } else {
        tracing::debug!("Route result ignored: {}", err);
        FormView::new()
    }
}
