//! Transient input buffers for the login, register and update forms.
//!
//! Each form is a flat set of string fields. Forms never touch storage;
//! they live only as long as the screen that edits them.

use serde::Serialize;

/// A focusable slot on a form. `Submit` is the form's button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
    Confirmation,
    Submit,
}

/// Common editing surface shared by every form
pub trait Form {
    /// Focusable slots in display order, ending with `Field::Submit`
    fn fields(&self) -> &'static [Field];

    fn value(&self, field: Field) -> Option<&str>;

    fn value_mut(&mut self, field: Field) -> Option<&mut String>;

    fn clear(&mut self);

    /// Next slot after `current`, wrapping back to the first
    fn next_field(&self, current: Field) -> Field {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == current).unwrap_or(0);
        fields[(idx + 1) % fields.len()]
    }

    /// Previous slot before `current`, wrapping to the last
    fn prev_field(&self, current: Field) -> Field {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == current).unwrap_or(0);
        fields[(idx + fields.len() - 1) % fields.len()]
    }

    fn first_field(&self) -> Field {
        self.fields()[0]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl Form for LoginForm {
    fn fields(&self) -> &'static [Field] {
        &[Field::Email, Field::Password, Field::Submit]
    }

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email => Some(&self.email),
            Field::Password => Some(&self.password),
            _ => None,
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            _ => None,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterForm {
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.email.is_empty()
            && !self.password.is_empty()
            && !self.password_confirmation.is_empty()
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

impl Form for RegisterForm {
    fn fields(&self) -> &'static [Field] {
        &[
            Field::Name,
            Field::Email,
            Field::Password,
            Field::Confirmation,
            Field::Submit,
        ]
    }

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Email => Some(&self.email),
            Field::Password => Some(&self.password),
            Field::Confirmation => Some(&self.password_confirmation),
            Field::Submit => None,
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::Confirmation => Some(&mut self.password_confirmation),
            Field::Submit => None,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Profile edit buffer. An empty `password` means "keep the current one".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl UpdateForm {
    /// Seed from the current profile with blank password fields
    pub fn seeded(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }

    pub fn wants_new_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Confirmation only matters when a new password was entered
    pub fn passwords_match(&self) -> bool {
        !self.wants_new_password() || self.password == self.password_confirmation
    }

    pub fn clear_passwords(&mut self) {
        self.password.clear();
        self.password_confirmation.clear();
    }
}

impl Form for UpdateForm {
    fn fields(&self) -> &'static [Field] {
        &[
            Field::Name,
            Field::Email,
            Field::Password,
            Field::Confirmation,
            Field::Submit,
        ]
    }

    fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Email => Some(&self.email),
            Field::Password => Some(&self.password),
            Field::Confirmation => Some(&self.password_confirmation),
            Field::Submit => None,
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::Confirmation => Some(&mut self.password_confirmation),
            Field::Submit => None,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_cycling_wraps() {
        let form = LoginForm::default();
        assert_eq!(form.next_field(Field::Email), Field::Password);
        assert_eq!(form.next_field(Field::Password), Field::Submit);
        assert_eq!(form.next_field(Field::Submit), Field::Email);
        assert_eq!(form.prev_field(Field::Email), Field::Submit);
        assert_eq!(form.prev_field(Field::Password), Field::Email);
    }

    #[test]
    fn test_foreign_field_restarts_cycle() {
        // Name is not on the login form; cycling starts from the top
        let form = LoginForm::default();
        assert_eq!(form.next_field(Field::Name), Field::Password);
    }

    #[test]
    fn test_register_validation() {
        let mut form = RegisterForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            password_confirmation: String::new(),
        };
        assert!(!form.is_complete());

        form.password_confirmation = "secret2".into();
        assert!(form.is_complete());
        assert!(!form.passwords_match());

        form.clear();
        assert_eq!(form, RegisterForm::default());
    }

    #[test]
    fn test_register_serializes_confirmation_key() {
        let form = RegisterForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            password_confirmation: "pw".into(),
        };
        let value = serde_json::to_value(&form).expect("should serialize");
        assert_eq!(value["password_confirmation"], "pw");
    }

    #[test]
    fn test_update_empty_password_skips_confirmation() {
        let mut form = UpdateForm::seeded("Ada", "ada@example.com");
        form.password_confirmation = "whatever".into();
        assert!(!form.wants_new_password());
        assert!(form.passwords_match());

        form.password = "new".into();
        assert!(!form.passwords_match());

        form.password_confirmation = "new".into();
        assert!(form.passwords_match());

        form.clear_passwords();
        assert_eq!(form, UpdateForm::seeded("Ada", "ada@example.com"));
    }
}
