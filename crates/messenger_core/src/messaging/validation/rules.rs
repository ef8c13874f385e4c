//! Declarative field rules.
//!
//! A [`RuleSet`] is an ordered table of [`FieldRules`], each naming a field, the
//! function extracting its value from the request and the ordered rules it must
//! satisfy. Evaluation follows two policies:
//!
//! - **one violation per field**: the first failing rule of a field records a
//!   violation and the remaining rules of that field are skipped;
//! - **no early abort**: every field of the table is evaluated, so a single
//!   response reports every offending field.

use crate::messaging::validation::Violation;

/// Value of a field, as seen by the rules.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for FieldValue<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(value)
    }
}

impl FieldValue<'_> {
    fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// Characters for text, bytes for binary values.
    fn len(&self) -> usize {
        match self {
            FieldValue::Text(text) => text.chars().count(),
            FieldValue::Bytes(bytes) => bytes.len(),
        }
    }
}

/// Reusable check applied to a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must not be empty.
    Required,
    /// Inclusive bounds on the value length.
    Length { min: usize, max: usize },
    /// ASCII letters, digits and underscores only.
    Identifier,
    /// Must contain both `@` and `.`.
    ///
    /// This is a shape check, not an address grammar.
    EmailShape,
    /// At least one letter, one digit and one special character.
    PasswordStrength,
}

impl Rule {
    /// Upper bound only.
    pub const fn max_len(max: usize) -> Self {
        Self::Length { min: 0, max }
    }

    /// Check `value`, returning the violation message on failure.
    pub fn check(&self, value: FieldValue<'_>) -> Result<(), String> {
        match (self, value) {
            (Rule::Required, value) => {
                if value.is_empty() {
                    return Err("value is required".to_string());
                }
            }
            (Rule::Length { min, max }, value) => {
                let unit = match value {
                    FieldValue::Text(_) => "characters",
                    FieldValue::Bytes(_) => "bytes",
                };
                let len = value.len();
                if len < *min {
                    return Err(format!("value length must be at least {min} {unit}"));
                }
                if len > *max {
                    return Err(format!("value length must be at most {max} {unit}"));
                }
            }
            (Rule::Identifier | Rule::EmailShape | Rule::PasswordStrength, FieldValue::Bytes(_)) => {
                return Err("value must be text".to_string());
            }
            (Rule::Identifier, FieldValue::Text(text)) => {
                if !text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(
                        "value must contain only letters, digits and underscores".to_string()
                    );
                }
            }
            (Rule::EmailShape, FieldValue::Text(text)) => {
                if !(text.contains('@') && text.contains('.')) {
                    return Err("value must be a valid email address".to_string());
                }
            }
            (Rule::PasswordStrength, FieldValue::Text(text)) => {
                let letter = text.chars().any(char::is_alphabetic);
                let digit = text.chars().any(|c| c.is_ascii_digit());
                let special = text.chars().any(|c| !c.is_alphanumeric());
                if !(letter && digit && special) {
                    return Err(
                        "value must contain letters, digits and a special character".to_string()
                    );
                }
            }
        }
        Ok(())
    }
}

/// Ordered rules of a single field.
pub struct FieldRules<R> {
    pub field: &'static str,
    pub extract: for<'a> fn(&'a R) -> FieldValue<'a>,
    pub rules: &'static [Rule],
}

impl<R> FieldRules<R> {
    /// First violated rule of this field, if any.
    pub fn check(&self, request: &R) -> Option<String> {
        let value = (self.extract)(request);
        self.rules.iter().find_map(|rule| rule.check(value).err())
    }
}

/// Ordered rule table of a request type.
pub struct RuleSet<R: 'static>(pub &'static [FieldRules<R>]);

impl<R: 'static> RuleSet<R> {
    /// Evaluate every field, in declaration order.
    pub fn evaluate(&self, request: &R) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.evaluate_into(request, "", &mut violations);
        violations
    }

    /// Evaluate every field, prefixing field paths with `prefix`.
    ///
    /// Used for nested messages, e.g. `attachments[2].`.
    pub fn evaluate_into(&self, request: &R, prefix: &str, violations: &mut Vec<Violation>) {
        for field in self.0 {
            if let Some(message) = field.check(request) {
                violations.push(Violation::new(format!("{prefix}{}", field.field), message));
            }
        }
    }
}
