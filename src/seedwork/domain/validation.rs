use serde::Serialize;
use serde_json::Value;

use super::notification::Notification;

// ============================================================================
// Validation - explicit rule sets evaluated by a pluggable provider
// ============================================================================
//
// Every aggregate type owns a `RuleSet`. Its `validate()` step projects
// itself to JSON and hands the projection to a `ValidationProvider`. The
// violations are written into the aggregate's Notification; nothing throws.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must be present and not null.
    Required,
    /// Strings, arrays and objects must not be empty.
    NotEmpty,
    /// Maximum number of characters for strings.
    MaxLength(usize),
    /// Inclusive numeric bounds.
    Range { min: Option<i64>, max: Option<i64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub group: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule in the group named after the field.
    pub fn rule(self, field: &'static str, rule: Rule) -> Self {
        self.grouped(field, rule, field)
    }

    pub fn grouped(mut self, field: &'static str, rule: Rule, group: &'static str) -> Self {
        self.rules.push(FieldRule { field, rule, group });
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

pub trait ValidationProvider: Send + Sync {
    /// `groups = None` evaluates every rule.
    fn validate(&self, data: &Value, rules: &RuleSet, groups: Option<&[&str]>) -> Vec<Violation>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidationProvider;

impl DefaultValidationProvider {
    fn check(field: &str, rule: &Rule, value: &Value) -> Option<String> {
        match rule {
            Rule::Required => value
                .is_null()
                .then(|| format!("{field} should not be null or undefined")),
            Rule::NotEmpty => {
                let empty = match value {
                    Value::Null => true,
                    Value::String(s) => s.is_empty(),
                    Value::Array(items) => items.is_empty(),
                    Value::Object(map) => map.is_empty(),
                    _ => false,
                };
                empty.then(|| format!("{field} should not be empty"))
            }
            Rule::MaxLength(max) => match value {
                Value::String(s) if s.chars().count() > *max => Some(format!(
                    "{field} must be shorter than or equal to {max} characters"
                )),
                _ => None,
            },
            Rule::Range { min, max } => {
                let number = value.as_f64()?;
                if let Some(min) = min {
                    if number < *min as f64 {
                        return Some(format!("{field} must not be less than {min}"));
                    }
                }
                if let Some(max) = max {
                    if number > *max as f64 {
                        return Some(format!("{field} must not be greater than {max}"));
                    }
                }
                None
            }
        }
    }
}

impl ValidationProvider for DefaultValidationProvider {
    fn validate(&self, data: &Value, rules: &RuleSet, groups: Option<&[&str]>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field_rule in rules.rules() {
            if let Some(groups) = groups {
                if !groups.contains(&field_rule.group) {
                    continue;
                }
            }

            let value = data.get(field_rule.field).unwrap_or(&Value::Null);

            // A missing optional value has nothing else to check
            if value.is_null() && !matches!(field_rule.rule, Rule::Required | Rule::NotEmpty) {
                continue;
            }

            if let Some(message) = Self::check(field_rule.field, &field_rule.rule, value) {
                violations.push(Violation {
                    field: field_rule.field.to_string(),
                    message,
                });
            }
        }

        violations
    }
}

/// Re-runs validation. Without groups the notification is rebuilt; with
/// groups only the fields those groups cover are replaced.
pub fn validate_into<T: Serialize>(
    notification: &mut Notification,
    provider: &dyn ValidationProvider,
    data: &T,
    rules: &RuleSet,
    groups: Option<&[&str]>,
) -> bool {
    match groups {
        None => notification.clear(),
        Some(groups) => {
            let fields: Vec<&str> = rules
                .rules()
                .iter()
                .filter(|field_rule| groups.contains(&field_rule.group))
                .map(|field_rule| field_rule.field)
                .collect();
            notification.clear_fields(&fields);
        }
    }

    let projection = match serde_json::to_value(data) {
        Ok(projection) => projection,
        Err(e) => {
            notification.add_error(format!("could not project entity for validation: {e}"), None);
            return false;
        }
    };

    for violation in provider.validate(&projection, rules, groups) {
        notification.add_error(violation.message, Some(&violation.field));
    }

    !notification.has_errors()
}
