pub mod credentials;
pub mod models;

pub use credentials::CredentialStore;
pub use models::{LoginForm, RegistrationForm, UserAccount};

use ridebook_core::ValidationErrors;
use ridebook_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid form input: {0}")]
    Validation(ValidationErrors),

    /// Unknown email and wrong password look the same
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<ValidationErrors> for AccountError {
    fn from(errors: ValidationErrors) -> Self {
        AccountError::Validation(errors)
    }
}
