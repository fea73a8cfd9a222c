//! The validated user entry form.

use std::collections::BTreeMap;

use tracing::{debug, instrument};
use vitrine_core::UserId;
use vitrine_core::validation::{
    coerce_number, is_valid_email, is_valid_number, is_valid_optional_url, is_valid_text,
};

use crate::models::User;
use crate::store::KeyValueStore;
use crate::sync::Catalog;

use super::SubmitError;

/// Input fields of the user form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    FirstName,
    LastName,
    Email,
    Age,
    Image,
}

impl UserField {
    pub const ALL: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Age,
        Self::Image,
    ];

    /// Field name as used in the snapshot and in form markup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Age => "age",
            Self::Image => "image",
        }
    }

    /// Message attached to the field when its value is rejected.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::FirstName => "Nome: 3 a 50 caracteres",
            Self::LastName => "Sobrenome: 3 a 50 caracteres",
            Self::Email => "Email inválido",
            Self::Age => "Idade deve ser número >0 e <120",
            Self::Image => "URL inválida",
        }
    }

    /// Whether `value` (already trimmed) is acceptable for this field.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::FirstName | Self::LastName => is_valid_text(value),
            Self::Email => is_valid_email(value),
            Self::Age => is_valid_number(value),
            Self::Image => is_valid_optional_url(value),
        }
    }
}

/// Raw user input plus the per-field error annotations of the last
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub image: String,
    annotations: BTreeMap<UserField, &'static str>,
}

impl UserForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of `field`.
    #[must_use]
    pub fn value(&self, field: UserField) -> &str {
        match field {
            UserField::FirstName => &self.first_name,
            UserField::LastName => &self.last_name,
            UserField::Email => &self.email,
            UserField::Age => &self.age,
            UserField::Image => &self.image,
        }
    }

    /// Replace the raw value of `field`.
    pub fn set(&mut self, field: UserField, value: impl Into<String>) {
        let slot = match field {
            UserField::FirstName => &mut self.first_name,
            UserField::LastName => &mut self.last_name,
            UserField::Email => &mut self.email,
            UserField::Age => &mut self.age,
            UserField::Image => &mut self.image,
        };
        *slot = value.into();
    }

    /// Error annotations from the last [`validate`](Self::validate).
    #[must_use]
    pub const fn annotations(&self) -> &BTreeMap<UserField, &'static str> {
        &self.annotations
    }

    #[must_use]
    pub fn annotation(&self, field: UserField) -> Option<&'static str> {
        self.annotations.get(&field).copied()
    }

    /// Check every field, attaching the field's message on failure and
    /// clearing it on success. Returns `true` when all fields pass.
    pub fn validate(&mut self) -> bool {
        for field in UserField::ALL {
            if field.accepts(self.value(field).trim()) {
                self.annotations.remove(&field);
            } else {
                self.annotations.insert(field, field.message());
            }
        }
        self.annotations.is_empty()
    }

    /// Clear all values and annotations.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build a record from the trimmed values. Does not validate.
    #[must_use]
    pub fn to_user(&self, id: UserId) -> User {
        let age = coerce_number(&self.age).filter(|years| *years > 0.0);
        User {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            age,
            image: self.image.trim().to_string(),
        }
    }

    /// Validate, then prepend the new user to `catalog` and reset the form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] with the annotations when any field
    /// fails; nothing is stored and the form is kept. Returns
    /// [`SubmitError::Catalog`] if the store write fails.
    #[instrument(skip_all)]
    pub fn submit<S: KeyValueStore>(
        &mut self,
        catalog: &mut Catalog<User, S>,
    ) -> Result<User, SubmitError> {
        if !self.validate() {
            debug!(invalid = self.annotations.len(), "User form rejected");
            return Err(SubmitError::Invalid(self.annotations.clone()));
        }

        let user = self.to_user(UserId::new(catalog.fresh_id()));
        catalog.append(user.clone())?;
        self.reset();
        Ok(user)
    }
}
