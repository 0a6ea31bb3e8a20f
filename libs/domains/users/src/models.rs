use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::validation::{validate_not_blank, validate_past_date};

/// Phone numbers are 7 to 10 digits, nothing else
static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{7,10}$").unwrap());

/// User entity as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier assigned on creation, never reused
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub birth_date: NaiveDate,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Full user representation, used for creation and replacement (PUT).
///
/// An `id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[validate(
        custom(function = "validate_not_blank", message = "Email is required"),
        email(message = "Email should be valid")
    )]
    pub email: String,
    #[validate(custom(function = "validate_not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "validate_not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "validate_past_date", message = "Birth date must be in the past"))]
    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(regex(
        path = *PHONE_NUMBER,
        message = "Phone number should contain between 7 and 10 digits"
    ))]
    pub phone_number: Option<String>,
}

/// Partial update (PATCH). Absent or `null` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchUser {
    #[validate(
        custom(function = "validate_not_blank", message = "Email is required"),
        email(message = "Email should be valid")
    )]
    pub email: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_past_date", message = "Birth date must be in the past"))]
    #[schema(value_type = Option<String>, format = Date, example = "1990-05-17")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    #[validate(regex(
        path = *PHONE_NUMBER,
        message = "Phone number should contain between 7 and 10 digits"
    ))]
    pub phone_number: Option<String>,
}

/// Inclusive birth date range for `GET /users/search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthDateRange {
    /// First birth date included in the result
    #[param(value_type = String, format = Date, example = "1990-01-01")]
    pub from: NaiveDate,
    /// Last birth date included in the result
    #[param(value_type = String, format = Date, example = "2000-12-31")]
    pub to: NaiveDate,
}

impl User {
    /// Build a user from the creation payload and a freshly assigned id
    pub fn new(id: u64, input: UserInput) -> Self {
        Self {
            id,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            birth_date: input.birth_date,
            address: input.address,
            phone_number: input.phone_number,
        }
    }

    /// Overwrite every field; optional fields missing from `input` are cleared
    pub fn replace(&mut self, input: UserInput) {
        self.email = input.email;
        self.first_name = input.first_name;
        self.last_name = input.last_name;
        self.birth_date = input.birth_date;
        self.address = input.address;
        self.phone_number = input.phone_number;
    }

    /// Merge the fields present in `patch`
    pub fn apply_patch(&mut self, patch: PatchUser) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
    }

    /// Whether the birth date falls inside `[from, to]`
    pub fn born_between(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.birth_date >= from && self.birth_date <= to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::today;
    use chrono::Months;

    fn input() -> UserInput {
        UserInput {
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            address: Some("1 Main St".to_string()),
            phone_number: Some("1234567".to_string()),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let user = User::new(1, input());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["birthDate"], "1990-05-17");
        assert_eq!(json["phoneNumber"], "1234567");
    }

    #[test]
    fn test_input_ignores_client_id_and_defaults_optionals() {
        let input: UserInput = serde_json::from_value(serde_json::json!({
            "id": 99,
            "email": "a@b.io",
            "firstName": "A",
            "lastName": "B",
            "birthDate": "1980-01-01"
        }))
        .unwrap();

        assert_eq!(input.address, None);
        assert_eq!(input.phone_number, None);
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        let mut bad = input();
        bad.email = "not-an-email".to_string();

        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let mut bad = input();
        bad.first_name = "   ".to_string();
        bad.last_name = String::new();

        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_birth_date_must_be_in_the_past() {
        let mut bad = input();
        bad.birth_date = today();
        assert!(bad.validate().is_err());

        bad.birth_date = today().checked_add_months(Months::new(1)).unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_phone_number_pattern() {
        for valid in ["1234567", "1234567890"] {
            let mut user = input();
            user.phone_number = Some(valid.to_string());
            assert!(user.validate().is_ok(), "{valid} should be accepted");
        }

        for invalid in ["123456", "12345678901", "12345a7", "+1234567"] {
            let mut user = input();
            user.phone_number = Some(invalid.to_string());
            assert!(user.validate().is_err(), "{invalid} should be rejected");
        }
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(PatchUser::default().validate().is_ok());
    }

    #[test]
    fn test_patch_validates_present_fields_only() {
        let patch = PatchUser {
            email: Some("broken".to_string()),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
    }

    #[test]
    fn test_replace_clears_missing_optionals() {
        let mut user = User::new(3, input());
        user.replace(UserInput {
            address: None,
            phone_number: None,
            first_name: "Janet".to_string(),
            ..input()
        });

        assert_eq!(user.id, 3);
        assert_eq!(user.first_name, "Janet");
        assert_eq!(user.address, None);
        assert_eq!(user.phone_number, None);
    }

    #[test]
    fn test_apply_patch_keeps_absent_fields() {
        let mut user = User::new(3, input());
        user.apply_patch(PatchUser {
            last_name: Some("Smith".to_string()),
            ..Default::default()
        });

        assert_eq!(user.last_name, "Smith");
        assert_eq!(user.first_name, "Jane");
        assert_eq!(user.address.as_deref(), Some("1 Main St"));
        assert_eq!(user.phone_number.as_deref(), Some("1234567"));
    }

    #[test]
    fn test_born_between_is_inclusive() {
        let user = User::new(1, input());
        let day = user.birth_date;

        assert!(user.born_between(day, day));
        assert!(!user.born_between(day.succ_opt().unwrap(), day.succ_opt().unwrap()));
    }
}
