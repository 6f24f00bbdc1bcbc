//! Field-level validation errors and reusable rule functions.
//!
//! Request types declare their synchronous rules with the `validator` derive
//! and reference the custom rules below. Rules that need the database
//! (uniqueness, existence) live next to the request types in the API crate
//! and report into the same [`FieldErrors`] map.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Earliest accepted release year (first motion pictures).
pub const MIN_RELEASE_YEAR: i32 = 1888;

/// How many years ahead of today a release year may be announced.
pub const RELEASE_YEAR_LOOKAHEAD: i32 = 5;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,32}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Validation messages grouped by field name.
///
/// Serializes as `{ "field": ["message", ...] }`. Field order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an error map holding one message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Append every message of `other`, keeping per-field order.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of all fields that failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when no errors were recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                out.add(field.to_string(), describe(error));
            }
        }
        out
    }
}

/// Human-readable message for a `validator` error, falling back to its code.
fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => match error.code.as_ref() {
            "length" => length_message(error),
            "range" => range_message(error),
            "email" => "Must be a valid email address".to_string(),
            "url" => "Must be a valid URL".to_string(),
            "must_match" => "Values do not match".to_string(),
            code => format!("Failed '{code}' check"),
        },
    }
}

fn length_message(error: &ValidationError) -> String {
    let min = error.params.get("min").and_then(|v| v.as_u64());
    let max = error.params.get("max").and_then(|v| v.as_u64());
    match (min, max) {
        (Some(min), Some(max)) => format!("Length must be between {min} and {max} characters"),
        (Some(min), None) => format!("Must be at least {min} characters long"),
        (None, Some(max)) => format!("Must be at most {max} characters long"),
        (None, None) => "Invalid length".to_string(),
    }
}

fn range_message(error: &ValidationError) -> String {
    let min = error.params.get("min").and_then(|v| v.as_f64());
    let max = error.params.get("max").and_then(|v| v.as_f64());
    match (min, max) {
        (Some(min), Some(max)) => format!("Must be between {min} and {max}"),
        (Some(min), None) => format!("Must be at least {min}"),
        (None, Some(max)) => format!("Must be at most {max}"),
        (None, None) => "Out of range".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Custom rules (usable from `#[validate(custom(function = ...))]`)
// ---------------------------------------------------------------------------

fn rule_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Usernames are 3-32 characters of letters, digits, `_`, `.` or `-`.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(rule_error(
            "username",
            "Username must be 3-32 characters of letters, digits, '_', '.' or '-'",
        ))
    }
}

/// Passwords need a minimum length plus at least one letter and one digit.
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(rule_error(
            "password_strength",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        ));
    }
    let has_letter = value.chars().any(char::is_alphabetic);
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(rule_error(
            "password_strength",
            "Password must contain at least one letter and one digit",
        ));
    }
    Ok(())
}

/// Rejects values that are empty after trimming whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule_error("not_blank", "Must not be blank"))
    } else {
        Ok(())
    }
}

/// Check a release year against `[MIN_RELEASE_YEAR, current year + lookahead]`.
pub fn check_release_year(year: i32, current_year: i32) -> Result<(), String> {
    let max = current_year + RELEASE_YEAR_LOOKAHEAD;
    if (MIN_RELEASE_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        Err(format!("Release year must be between {MIN_RELEASE_YEAR} and {max}"))
    }
}

/// [`check_release_year`] against today's UTC year.
pub fn check_release_year_now(year: i32) -> Result<(), String> {
    check_release_year(year, chrono::Utc::now().year())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(custom(function = "validate_username"))]
        username: String,
        #[validate(email)]
        email: String,
        #[validate(length(min = 1, max = 5))]
        nickname: String,
    }

    #[test]
    fn field_errors_merge_keeps_all_messages() {
        let mut a = FieldErrors::single("name", "too short");
        let mut b = FieldErrors::single("name", "already taken");
        b.add("email", "invalid");
        a.merge(b);

        assert_eq!(
            a.get("name"),
            Some(&["too short".to_string(), "already taken".to_string()][..])
        );
        assert_eq!(a.fields().collect::<Vec<_>>(), vec!["email", "name"]);
    }

    #[test]
    fn empty_field_errors_is_ok() {
        assert_matches!(FieldErrors::new().into_result(), Ok(()));
        assert_matches!(FieldErrors::single("x", "y").into_result(), Err(_));
    }

    #[test]
    fn field_errors_serialize_as_map() {
        let errors = FieldErrors::single("name", "Must not be blank");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "name": ["Must not be blank"] }));
    }

    #[test]
    fn converts_validator_errors_with_readable_messages() {
        let input = Signup {
            username: "a!".to_string(),
            email: "not-an-email".to_string(),
            nickname: "waytoolong".to_string(),
        };
        let errors: FieldErrors = input.validate().unwrap_err().into();

        assert!(errors.get("username").unwrap()[0].starts_with("Username must be"));
        assert_eq!(
            errors.get("email").unwrap(),
            &["Must be a valid email address".to_string()][..]
        );
        assert_eq!(
            errors.get("nickname").unwrap(),
            &["Length must be between 1 and 5 characters".to_string()][..]
        );
    }

    #[test]
    fn username_rule() {
        assert!(validate_username("neo.anderson_99").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn password_strength_rule() {
        assert!(validate_password_strength("abc12345").is_ok());
        assert!(validate_password_strength("short1").is_err());
        assert!(validate_password_strength("lettersonly").is_err());
        assert!(validate_password_strength("1234567890").is_err());
    }

    #[test]
    fn not_blank_rule() {
        assert!(validate_not_blank("  Drama ").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn release_year_bounds() {
        assert!(check_release_year(1888, 2026).is_ok());
        assert!(check_release_year(2031, 2026).is_ok());
        assert!(check_release_year(1887, 2026).is_err());
        assert_eq!(
            check_release_year(2032, 2026).unwrap_err(),
            "Release year must be between 1888 and 2031"
        );
    }
}
