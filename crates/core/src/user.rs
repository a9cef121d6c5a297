//! Users of the three account kinds and the forms that create them.
//!
//! Login and signup are simulated: any well-formed submission succeeds.
//! The validation rules mirror what the signup screens ask for.

use serde::{Deserialize, Serialize};

use crate::types::{Email, Gender, UserId, UserKind};

pub(crate) const MIN_NAME_LEN: usize = 2;
pub(crate) const MIN_PHONE_LEN: usize = 10;
const MIN_PASSWORD_LEN: usize = 6;
pub(crate) const MIN_ADDRESS_LEN: usize = 5;

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for `field`, if it was rejected.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// All messages joined into one line.
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Ok(value)` when no errors were recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field was rejected.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    pub(crate) fn check_min_len(&mut self, field: &'static str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.add(field, message);
        }
    }

    fn check_email(&mut self, field: &'static str, value: &str) -> Option<Email> {
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(_) => {
                self.add(field, "Invalid email address");
                None
            }
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the rejected fields when the email is malformed or the password
    /// is shorter than six characters.
    pub fn validate(&self) -> Result<Email, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = errors.check_email("email", &self.email);
        errors.check_min_len(
            "password",
            &self.password,
            MIN_PASSWORD_LEN,
            "Password must be at least 6 characters",
        );
        match email {
            Some(email) => errors.finish(email),
            None => Err(errors),
        }
    }
}

/// Signup form.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// A validated signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub name: String,
    pub email: Email,
    pub phone: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns every rejected field.
    pub fn validate(&self) -> Result<Signup, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_min_len(
            "name",
            &self.name,
            MIN_NAME_LEN,
            "Name must be at least 2 characters",
        );
        let email = errors.check_email("email", &self.email);
        errors.check_min_len(
            "phone",
            &self.phone,
            MIN_PHONE_LEN,
            "Phone number must be at least 10 digits",
        );
        errors.check_min_len(
            "password",
            &self.password,
            MIN_PASSWORD_LEN,
            "Password must be at least 6 characters",
        );
        if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords don't match");
        }
        match email {
            Some(email) => errors.finish(Signup {
                name: self.name.trim().to_string(),
                email,
                phone: self.phone.trim().to_string(),
            }),
            None => Err(errors),
        }
    }
}

/// Store details collected after a store owner signs up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProfile {
    pub store_name: String,
    pub email: Email,
    pub contact: String,
    pub tagline: String,
    pub description: String,
}

/// Store setup form.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSetupForm {
    pub store_name: String,
    pub email: String,
    pub contact: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
}

impl StoreSetupForm {
    /// # Errors
    ///
    /// Returns the rejected fields when store name, email or contact are
    /// missing or malformed.
    pub fn validate(&self) -> Result<StoreProfile, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_min_len("store_name", &self.store_name, 1, "Store name is required");
        let email = errors.check_email("email", &self.email);
        errors.check_min_len("contact", &self.contact, 1, "Contact number is required");
        match email {
            Some(email) => errors.finish(StoreProfile {
                store_name: self.store_name.trim().to_string(),
                email,
                contact: self.contact.trim().to_string(),
                tagline: self.tagline.trim().to_string(),
                description: self.description.trim().to_string(),
            }),
            None => Err(errors),
        }
    }
}

/// Courier details collected during delivery partner setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierProfile {
    pub gender: Gender,
    pub address: String,
    /// The uploaded ID proof as a `data:` URL.
    pub id_proof: String,
}

/// Delivery partner setup form.
#[derive(Debug, Clone, Default)]
pub struct CourierSetupForm {
    pub name: String,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub id_proof: Option<String>,
}

/// A validated delivery partner setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourierSetup {
    pub name: String,
    pub phone: String,
    pub profile: CourierProfile,
}

impl CourierSetupForm {
    /// # Errors
    ///
    /// Returns every rejected field. An ID proof upload is mandatory.
    pub fn validate(&self) -> Result<CourierSetup, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_min_len("name", &self.name, MIN_NAME_LEN, "Name is required");
        let gender = match self.gender.as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => {
                errors.add("gender", "Please select a gender");
                None
            }
        };
        errors.check_min_len(
            "phone",
            &self.phone,
            MIN_PHONE_LEN,
            "Valid phone number is required",
        );
        errors.check_min_len(
            "address",
            &self.address,
            MIN_ADDRESS_LEN,
            "Complete address is required",
        );
        let id_proof = self.id_proof.clone().filter(|proof| !proof.is_empty());
        if id_proof.is_none() {
            errors.add("id_proof", "Please upload a valid ID proof");
        }

        match (gender, id_proof) {
            (Some(gender), Some(id_proof)) => errors.finish(CourierSetup {
                name: self.name.trim().to_string(),
                phone: self.phone.trim().to_string(),
                profile: CourierProfile {
                    gender,
                    address: self.address.trim().to_string(),
                    id_proof,
                },
            }),
            _ => Err(errors),
        }
    }
}

/// Profile edit form, shared by all user kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
}

/// Validated profile edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: String,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns the rejected fields when the name or phone is too short.
    pub fn validate(&self) -> Result<ProfileUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_min_len("name", &self.name, MIN_NAME_LEN, "Name must be at least 2 characters");
        errors.check_min_len(
            "phone",
            &self.phone,
            MIN_PHONE_LEN,
            "Phone number must be at least 10 digits",
        );
        errors.finish(ProfileUpdate {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub kind: UserKind,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub store: Option<StoreProfile>,
    #[serde(default)]
    pub courier: Option<CourierProfile>,
}

impl User {
    /// A user created by the simulated login.
    ///
    /// Nothing is looked up; the display name is a placeholder for the kind.
    #[must_use]
    pub fn logged_in(id: UserId, kind: UserKind, email: Email) -> Self {
        Self {
            id,
            kind,
            name: kind.default_display_name().to_string(),
            email,
            phone: None,
            store: None,
            courier: None,
        }
    }

    /// A user created by a validated signup.
    #[must_use]
    pub fn signed_up(id: UserId, kind: UserKind, signup: Signup) -> Self {
        Self {
            id,
            kind,
            name: signup.name,
            email: signup.email,
            phone: Some(signup.phone),
            store: None,
            courier: None,
        }
    }

    /// Apply a completed delivery partner setup.
    pub fn complete_courier_setup(&mut self, setup: CourierSetup) {
        self.name = setup.name;
        self.phone = Some(setup.phone);
        self.courier = Some(setup.profile);
    }

    /// Apply a completed store setup.
    pub fn complete_store_setup(&mut self, profile: StoreProfile) {
        self.store = Some(profile);
    }

    /// Apply edits from the profile page.
    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.name = update.name;
        self.phone = Some(update.phone);
    }

    /// Whether the kind-specific onboarding has been completed.
    #[must_use]
    pub const fn is_profile_complete(&self) -> bool {
        match self.kind {
            UserKind::Customer => true,
            UserKind::Store => self.store.is_some(),
            UserKind::Delivery => self.courier.is_some(),
        }
    }

    /// First letter of the name, for avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signup_form() -> SignupForm {
        SignupForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
        }
    }

    #[test]
    fn test_login_validation() {
        let ok = LoginForm {
            email: "Rider@Example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert_eq!(ok.validate().unwrap().as_str(), "rider@example.com");

        let bad = LoginForm {
            email: "rider".to_string(),
            password: "123".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.message_for("email"), Some("Invalid email address"));
    }

    #[test]
    fn test_signup_validation_collects_all_errors() {
        let form = SignupForm {
            name: "A".to_string(),
            phone: "12345".to_string(),
            confirm_password: "different".to_string(),
            ..signup_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.message_for("name").is_some());
        assert!(errors.message_for("phone").is_some());
        assert_eq!(errors.message_for("confirm_password"), Some("Passwords don't match"));
        assert!(errors.message_for("email").is_none());
    }

    #[test]
    fn test_signed_up_user() {
        let signup = signup_form().validate().unwrap();
        let user = User::signed_up(UserId::new(1), UserKind::Customer, signup);
        assert_eq!(user.name, "Asha Rao");
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
        assert!(user.is_profile_complete());
        assert_eq!(user.initial(), "A");
    }

    #[test]
    fn test_logged_in_user_uses_kind_name() {
        let email = Email::parse("owner@example.com").unwrap();
        let user = User::logged_in(UserId::new(2), UserKind::Store, email);
        assert_eq!(user.name, "Store Owner");
        assert!(!user.is_profile_complete());
    }

    #[test]
    fn test_courier_setup_requires_id_proof() {
        let form = CourierSetupForm {
            name: "Ravi".to_string(),
            gender: "male".to_string(),
            phone: "9876543210".to_string(),
            address: "12 Lake Road".to_string(),
            id_proof: None,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message_for("id_proof"),
            Some("Please upload a valid ID proof")
        );

        let form = CourierSetupForm {
            id_proof: Some("data:image/png;base64,AAAA".to_string()),
            ..form
        };
        let setup = form.validate().unwrap();
        let email = Email::parse("ravi@example.com").unwrap();
        let mut user = User::logged_in(UserId::new(3), UserKind::Delivery, email);
        user.complete_courier_setup(setup);
        assert_eq!(user.name, "Ravi");
        assert!(user.is_profile_complete());
        assert_eq!(user.courier.unwrap().gender, Gender::Male);
    }

    #[test]
    fn test_courier_setup_rejects_unknown_gender() {
        let form = CourierSetupForm {
            name: "Ravi".to_string(),
            gender: "robot".to_string(),
            phone: "9876543210".to_string(),
            address: "12 Lake Road".to_string(),
            id_proof: Some("data:,x".to_string()),
        };
        assert!(form.validate().unwrap_err().message_for("gender").is_some());
    }

    #[test]
    fn test_store_setup_validation() {
        let form = StoreSetupForm {
            store_name: "  ".to_string(),
            email: "shop@example.com".to_string(),
            contact: String::new(),
            tagline: String::new(),
            description: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.summary(), "Store name is required; Contact number is required");
    }

    #[test]
    fn test_profile_update_replaces_name_and_phone() {
        let mut user = User::signed_up(UserId::new(4), UserKind::Customer, signup_form().validate().unwrap());
        let form = ProfileForm {
            name: " Asha R ".to_string(),
            phone: "9000000001".to_string(),
        };
        user.update_profile(form.validate().unwrap());
        assert_eq!(user.name, "Asha R");
        assert_eq!(user.phone.as_deref(), Some("9000000001"));

        let short = ProfileForm {
            name: "A".to_string(),
            phone: "123".to_string(),
        };
        assert_eq!(short.validate().unwrap_err().errors().len(), 2);
    }
}
