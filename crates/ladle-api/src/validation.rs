//! Declarative request validation
//!
//! Payload DTOs carry `validator` rules; every violation for a payload is
//! collected into one structured 400 response instead of failing on the
//! first rule. The [`ValidatedJson`] extractor deserializes and validates
//! in one step so handlers only ever see well-formed payloads.

use crate::error::{AppError, FieldError};
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Symbols accepted by the password complexity rule.
const PASSWORD_SYMBOLS: &str = "@$!%*?&_";

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub username: String,

    #[validate(
        email(message = "Email is invalid"),
        length(max = 244, message = "Email cannot exceed 244 characters")
    )]
    pub email: String,

    #[validate(
        length(
            min = 8,
            max = 255,
            message = "Password must be between 8 and 255 characters"
        ),
        custom(function = password_complexity)
    )]
    pub password: String,
}

/// Login payload.
///
/// Deliberately looser than registration: only presence as strings is
/// required, so credentials that were valid at registration time are never
/// rejected by a later tightening of the rules.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

/// Partial user update. Present fields obey the registration rules.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub username: Option<String>,

    #[validate(
        email(message = "Email is invalid"),
        length(max = 244, message = "Email cannot exceed 244 characters")
    )]
    pub email: Option<String>,

    #[validate(
        length(
            min = 8,
            max = 255,
            message = "Password must be between 8 and 255 characters"
        ),
        custom(function = password_complexity)
    )]
    pub password: Option<String>,
}

/// Recipe creation payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRecipe {
    #[validate(length(min = 1, message = "Recipe name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(custom(function = ingredients_rule))]
    pub ingredients: Vec<String>,

    #[validate(custom(function = steps_rule))]
    pub steps: Vec<String>,
}

/// Partial recipe update. Present fields obey the creation rules.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRecipe {
    #[validate(length(min = 1, message = "Recipe name is required"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,

    #[validate(custom(function = ingredients_rule))]
    pub ingredients: Option<Vec<String>>,

    #[validate(custom(function = steps_rule))]
    pub steps: Option<Vec<String>>,
}

fn password_complexity(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_complexity");
        err.message = Some(
            "Password must contain lowercase letters, uppercase letters, numbers, and symbols"
                .into(),
        );
        Err(err)
    }
}

fn non_empty_entries(values: &[String], empty_list: &'static str, empty_entry: &'static str) -> Result<(), ValidationError> {
    if values.is_empty() {
        let mut err = ValidationError::new("min_items");
        err.message = Some(empty_list.into());
        return Err(err);
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        let mut err = ValidationError::new("empty_entry");
        err.message = Some(empty_entry.into());
        return Err(err);
    }
    Ok(())
}

fn ingredients_rule(values: &Vec<String>) -> Result<(), ValidationError> {
    non_empty_entries(
        values,
        "At least one ingredient is required",
        "The ingredient cannot be empty",
    )
}

fn steps_rule(values: &Vec<String>) -> Result<(), ValidationError> {
    non_empty_entries(
        values,
        "At least one step is required",
        "The step cannot be empty",
    )
}

/// Run a payload's validation rules, collapsing failures into one
/// [`AppError::Validation`] carrying every violated field.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|errors| {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid")),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(fields)
    })
}

/// JSON extractor that validates the payload before the handler runs.
///
/// Undeserializable bodies (missing fields, wrong types, bad JSON) surface
/// as the same structured 400 as rule violations.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::Validation(vec![FieldError {
                field: "body".to_string(),
                message: rejection.body_text(),
            }])
        })?;

        validate_payload(&payload)?;

        Ok(Self(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn violated_fields<T: Validate>(payload: &T) -> Vec<String> {
        match validate_payload(payload) {
            Ok(()) => vec![],
            Err(AppError::Validation(errors)) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            Err(_) => panic!("unexpected error kind"),
        }
    }

    fn register(username: &str, email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        let payload = register("Patata", "patata@email.com", "Password7_");
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn test_short_username_is_rejected() {
        assert_eq!(
            violated_fields(&register("ab", "a@b.com", "Password7_")),
            vec!["username"]
        );
    }

    #[test]
    fn test_invalid_email_is_rejected() {
        assert_eq!(
            violated_fields(&register("Patata", "not-an-email", "Password7_")),
            vec!["email"]
        );
    }

    #[test]
    fn test_password_without_digit_is_rejected() {
        assert_eq!(
            violated_fields(&register("Patata", "a@b.com", "Password_!")),
            vec!["password"]
        );
    }

    #[test]
    fn test_password_without_symbol_is_rejected() {
        assert_eq!(
            violated_fields(&register("Patata", "a@b.com", "Password77")),
            vec!["password"]
        );
    }

    #[test]
    fn test_all_violations_are_reported_together() {
        let fields = violated_fields(&register("ab", "nope", "short"));
        for expected in ["email", "password", "username"] {
            assert!(fields.iter().any(|f| f == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_login_schema_is_loose() {
        let payload = LoginUser {
            email: "anything".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn test_update_user_accepts_absent_fields() {
        assert!(validate_payload(&UpdateUser::default()).is_ok());
    }

    #[test]
    fn test_update_user_checks_present_fields() {
        let payload = UpdateUser {
            username: Some("ab".to_string()),
            ..Default::default()
        };
        assert_eq!(violated_fields(&payload), vec!["username"]);
    }

    #[test]
    fn test_recipe_requires_at_least_one_ingredient() {
        let payload = CreateRecipe {
            name: "Pasta".to_string(),
            description: "d".to_string(),
            ingredients: vec![],
            steps: vec!["Boil".to_string()],
        };
        assert_eq!(violated_fields(&payload), vec!["ingredients"]);
    }

    #[test]
    fn test_recipe_rejects_blank_step() {
        let payload = CreateRecipe {
            name: "Pasta".to_string(),
            description: "d".to_string(),
            ingredients: vec!["Pasta".to_string()],
            steps: vec!["Boil".to_string(), "  ".to_string()],
        };
        assert_eq!(violated_fields(&payload), vec!["steps"]);
    }

    #[test]
    fn test_recipe_update_checks_present_lists_only() {
        assert!(validate_payload(&UpdateRecipe::default()).is_ok());

        let payload = UpdateRecipe {
            ingredients: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(violated_fields(&payload), vec!["ingredients"]);
    }

    proptest! {
        #[test]
        fn prop_alphanumeric_only_passwords_never_pass(password in "[A-Za-z0-9]{8,40}") {
            let payload = register("Patata", "a@b.com", &password);
            prop_assert!(validate_payload(&payload).is_err());
        }

        #[test]
        fn prop_well_formed_passwords_always_pass(
            lower in "[a-z]{1,10}",
            upper in "[A-Z]{1,10}",
            digit in "[0-9]{1,10}",
            symbol in "[@$!%*?&_]{1,4}",
        ) {
            let password = format!("{lower}{upper}{digit}{symbol}");
            prop_assume!(password.len() >= 8);
            let payload = register("Patata", "a@b.com", &password);
            prop_assert!(validate_payload(&payload).is_ok());
        }
    }
}
