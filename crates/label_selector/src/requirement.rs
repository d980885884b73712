//! Single selector requirements and their evaluation rules.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::ParseError;
use crate::labels::Labels;

/// Maximum length of the name part of a label key, and of a label value.
const MAX_NAME_LEN: usize = 63;

/// Maximum length of the DNS subdomain prefix of a label key.
const MAX_PREFIX_LEN: usize = 253;

/// The comparison a requirement applies between a label key and its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    /// The key must be present, regardless of value.
    Exists,
    /// The key must be absent.
    DoesNotExist,
    /// The value must equal the single given value (`=`).
    Equals,
    /// The value must equal the single given value (`==`).
    DoubleEquals,
    /// The value must differ from the single given value, or the key
    /// must be absent (`!=`).
    NotEquals,
    /// The value must be one of the given values.
    In,
    /// The value must not be any of the given values, or the key must
    /// be absent.
    NotIn,
    /// The value, read as an integer, must be greater than the single
    /// given integer value (`>`).
    GreaterThan,
    /// The value, read as an integer, must be less than the single
    /// given integer value (`<`).
    LessThan,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operator::Exists => "exists",
            Operator::DoesNotExist => "!",
            Operator::Equals => "=",
            Operator::DoubleEquals => "==",
            Operator::NotEquals => "!=",
            Operator::In => "in",
            Operator::NotIn => "notin",
            Operator::GreaterThan => "gt",
            Operator::LessThan => "lt",
        };
        write!(f, "{}", text)
    }
}

/// One clause of a selector: a key, an operator and the operator's values.
///
/// Requirements are immutable once constructed; [`Requirement::new`]
/// validates the key, the values and the operator's arity, so every
/// existing requirement is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: Vec<String>,
}

impl Requirement {
    /// Creates a requirement after validating key, values and arity.
    ///
    /// The arity rules per operator:
    ///
    /// * `In` and `NotIn` need at least one value.
    /// * `Equals`, `DoubleEquals` and `NotEquals` need exactly one value.
    /// * `Exists` and `DoesNotExist` must not carry values.
    /// * `GreaterThan` and `LessThan` need exactly one integer value.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the key is not a qualified name,
    /// when a value violates the label value syntax, or when the number
    /// of values does not fit the operator.
    pub fn new(
        key: impl Into<String>,
        operator: Operator,
        values: Vec<String>,
    ) -> Result<Self, ParseError> {
        let key = key.into();
        validate_label_key(&key)?;
        match operator {
            Operator::In | Operator::NotIn => {
                if values.is_empty() {
                    return Err(ParseError::WrongValueCount {
                        key,
                        operator,
                        expected: "at least one value",
                        actual: 0,
                    });
                }
            }
            Operator::Equals | Operator::DoubleEquals | Operator::NotEquals => {
                if values.len() != 1 {
                    return Err(ParseError::WrongValueCount {
                        key,
                        operator,
                        expected: "exactly one value",
                        actual: values.len(),
                    });
                }
            }
            Operator::Exists | Operator::DoesNotExist => {
                if !values.is_empty() {
                    return Err(ParseError::WrongValueCount {
                        key,
                        operator,
                        expected: "no values",
                        actual: values.len(),
                    });
                }
            }
            Operator::GreaterThan | Operator::LessThan => {
                if values.len() != 1 {
                    return Err(ParseError::WrongValueCount {
                        key,
                        operator,
                        expected: "exactly one value",
                        actual: values.len(),
                    });
                }
                for value in &values {
                    if value.parse::<i64>().is_err() {
                        return Err(ParseError::NonIntegerValue {
                            key,
                            operator,
                            value: value.clone(),
                        });
                    }
                }
            }
        }
        for value in &values {
            validate_label_value(&key, value)?;
        }
        Ok(Self {
            key,
            operator,
            values,
        })
    }

    /// The label key this requirement inspects.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The operator applied to the key.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The values the operator compares against, in construction order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Evaluates the requirement against a label set.
    ///
    /// Absent keys are handled per operator: `NotEquals` and `NotIn`
    /// match when the key is missing, the equality, membership and
    /// ordering forms do not.
    pub fn matches(&self, labels: &impl Labels) -> bool {
        match self.operator {
            Operator::In | Operator::Equals | Operator::DoubleEquals => {
                match labels.get(&self.key) {
                    Some(value) => self.has_value(value),
                    None => false,
                }
            }
            Operator::NotIn | Operator::NotEquals => match labels.get(&self.key) {
                Some(value) => !self.has_value(value),
                None => true,
            },
            Operator::Exists => labels.has(&self.key),
            Operator::DoesNotExist => !labels.has(&self.key),
            Operator::GreaterThan | Operator::LessThan => {
                let Some(value) = labels.get(&self.key) else {
                    return false;
                };
                // A label value that is not an integer never satisfies an
                // ordering requirement.
                let Ok(label_value) = value.parse::<i64>() else {
                    return false;
                };
                if self.values.len() != 1 {
                    return false;
                }
                let Ok(bound) = self.values[0].parse::<i64>() else {
                    return false;
                };
                if self.operator == Operator::GreaterThan {
                    label_value > bound
                } else {
                    label_value < bound
                }
            }
        }
    }

    fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|candidate| candidate == value)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator == Operator::DoesNotExist {
            write!(f, "!")?;
        }
        write!(f, "{}", self.key)?;
        match self.operator {
            Operator::Exists | Operator::DoesNotExist => return Ok(()),
            Operator::Equals => write!(f, "=")?,
            Operator::DoubleEquals => write!(f, "==")?,
            Operator::NotEquals => write!(f, "!=")?,
            Operator::GreaterThan => write!(f, ">")?,
            Operator::LessThan => write!(f, "<")?,
            Operator::In => write!(f, " in ")?,
            Operator::NotIn => write!(f, " notin ")?,
        }
        match self.operator {
            Operator::In | Operator::NotIn => {
                let mut sorted = self.values.clone();
                sorted.sort();
                write!(f, "({})", sorted.join(","))
            }
            _ => write!(f, "{}", self.values.join(",")),
        }
    }
}

fn name_part_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?$")
            .expect("hard-coded name pattern must compile")
    })
}

fn subdomain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$")
            .expect("hard-coded subdomain pattern must compile")
    })
}

fn value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(([A-Za-z0-9][A-Za-z0-9._-]*)?[A-Za-z0-9])?$")
            .expect("hard-coded value pattern must compile")
    })
}

/// Checks that a key is a qualified name: an optional DNS subdomain
/// prefix separated by `/` from a name part.
fn validate_label_key(key: &str) -> Result<(), ParseError> {
    let invalid = |reason: &str| ParseError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let parts: Vec<&str> = key.split('/').collect();
    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                return Err(invalid("prefix part must be non-empty"));
            }
            if prefix.len() > MAX_PREFIX_LEN {
                return Err(invalid("prefix part must be no more than 253 characters"));
            }
            if !subdomain_pattern().is_match(prefix) {
                return Err(invalid(
                    "prefix part must be a lowercase DNS subdomain (e.g. 'example.com')",
                ));
            }
            *name
        }
        _ => {
            return Err(invalid(
                "must be a name with an optional DNS subdomain prefix and '/' (e.g. 'example.com/my-name')",
            ));
        }
    };
    if name.is_empty() {
        return Err(invalid("name part must be non-empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name part must be no more than 63 characters"));
    }
    if !name_part_pattern().is_match(name) {
        return Err(invalid(
            "name part must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

/// Checks that a value satisfies the label value syntax. Empty values
/// are allowed.
fn validate_label_value(key: &str, value: &str) -> Result<(), ParseError> {
    let invalid = |reason: &str| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    if value.len() > MAX_NAME_LEN {
        return Err(invalid("must be no more than 63 characters"));
    }
    if !value_pattern().is_match(value) {
        return Err(invalid(
            "must be empty or consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "requirement_tests.rs"]
mod tests;
