use ridebook_core::storage::keys;
use ridebook_core::validation::{is_valid_email, is_valid_password, is_valid_phone};
use ridebook_core::{Clock, KeyValueStore, PasswordStrength, ValidationErrors};
use ridebook_shared::pii::mask_email;
use ridebook_store::{AccountRules, JsonRecords};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{fields, LoginForm, RegistrationForm, UserAccount};
use crate::AccountError;

/// Single-user credential store over the injected key-value store.
pub struct CredentialStore {
    records: JsonRecords,
    rules: AccountRules,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>, rules: AccountRules, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: JsonRecords::new(store),
            rules,
            clock,
        }
    }

    /// Validate, then persist the account (replacing any previous one) and
    /// mark the session as logged in.
    pub async fn register(&self, form: &RegistrationForm) -> Result<UserAccount, AccountError> {
        self.validate_registration(form)?;

        let account = UserAccount {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            password: form.password.clone(),
            registered_at: self.clock.now(),
        };

        self.records.save(keys::USER, &account).await?;
        self.records.set_flag(keys::IS_LOGGED_IN, true).await?;

        info!("Registered account for {}", mask_email(&account.email));
        Ok(account)
    }

    pub fn validate_registration(&self, form: &RegistrationForm) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        self.check_name(&mut errors, fields::FIRST_NAME, "First name", &form.first_name);
        self.check_name(&mut errors, fields::LAST_NAME, "Last name", &form.last_name);

        let email = form.email.trim();
        if email.is_empty() {
            errors.add(fields::EMAIL, "Email is required");
        } else if !is_valid_email(email) {
            errors.add(fields::EMAIL, "Please enter a valid email address");
        }

        let phone = form.phone.trim();
        if phone.is_empty() {
            errors.add(fields::PHONE, "Phone number is required");
        } else if !is_valid_phone(phone, self.rules.phone_digits) {
            errors.add(
                fields::PHONE,
                format!("Please enter a valid {}-digit phone number", self.rules.phone_digits),
            );
        }

        let password = form.password.expose();
        if password.is_empty() {
            errors.add(fields::PASSWORD, "Password is required");
        } else if !is_valid_password(password, self.rules.min_password_len) {
            errors.add(
                fields::PASSWORD,
                format!(
                    "Password must be at least {} characters long",
                    self.rules.min_password_len
                ),
            );
        }

        let confirm = form.confirm_password.expose();
        if confirm.is_empty() {
            errors.add(fields::CONFIRM_PASSWORD, "Please confirm your password");
        } else if confirm != password {
            errors.add(fields::CONFIRM_PASSWORD, "Passwords do not match");
        }

        if !form.accept_terms {
            errors.add(fields::TERMS, "You must accept the terms and conditions");
        }

        errors.into_result(())
    }

    /// Check the credentials against the stored account.
    pub async fn login(&self, form: &LoginForm) -> Result<UserAccount, AccountError> {
        let email = form.email.trim();

        let mut errors = ValidationErrors::new();
        if email.is_empty() {
            errors.add(fields::LOGIN_EMAIL, "Email is required");
        } else if !is_valid_email(email) {
            errors.add(fields::LOGIN_EMAIL, "Please enter a valid email address");
        }
        if form.password.expose().is_empty() {
            errors.add(fields::LOGIN_PASSWORD, "Password is required");
        }
        errors.into_result(())?;

        let stored: Option<UserAccount> = self.records.load(keys::USER).await?;
        let account = match stored {
            Some(account) if account.email == email && account.password.matches(form.password.expose()) => account,
            _ => {
                warn!("Rejected login for {}", mask_email(email));
                return Err(AccountError::InvalidCredentials);
            }
        };

        self.records.set_flag(keys::IS_LOGGED_IN, true).await?;
        if form.remember_me {
            self.records.set_flag(keys::REMEMBER_ME, true).await?;
        }

        info!("Login succeeded for {}", mask_email(email));
        Ok(account)
    }

    pub async fn current_user(&self) -> Result<Option<UserAccount>, AccountError> {
        Ok(self.records.load(keys::USER).await?)
    }

    pub async fn is_logged_in(&self) -> Result<bool, AccountError> {
        Ok(self.records.flag(keys::IS_LOGGED_IN).await?)
    }

    pub async fn remembers_user(&self) -> Result<bool, AccountError> {
        Ok(self.records.flag(keys::REMEMBER_ME).await?)
    }

    pub fn password_strength(&self, password: &str) -> PasswordStrength {
        PasswordStrength::evaluate(password)
    }

    fn check_name(&self, errors: &mut ValidationErrors, field: &str, label: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            errors.add(field, format!("{} is required", label));
        } else if value.chars().count() < self.rules.min_name_len {
            errors.add(
                field,
                format!("{} must be at least {} characters", label, self.rules.min_name_len),
            );
        }
    }
}
