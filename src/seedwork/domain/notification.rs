use serde_json::{Map, Value};

use super::errors::{EntityValidationError, FieldErrors};

// ============================================================================
// Notification - non-throwing validation accumulator
// ============================================================================
//
// Field order and message order both follow insertion; duplicate messages
// are kept. Nothing in here ever fails: callers inspect `has_errors()` and
// decide whether to raise `EntityValidationError`.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notification {
    errors: Vec<FieldErrors>,
}

impl Notification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Without a field the message is its own key.
    pub fn add_error(&mut self, error: impl Into<String>, field: Option<&str>) {
        let error = error.into();
        let field = field.map(str::to_string).unwrap_or_else(|| error.clone());

        match self.errors.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.messages.push(error),
            None => self.errors.push(FieldErrors {
                field,
                messages: vec![error],
            }),
        }
    }

    /// Replaces every message stored under `field`.
    pub fn set_error(&mut self, messages: Vec<String>, field: &str) {
        match self.errors.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.messages = messages,
            None => self.errors.push(FieldErrors {
                field: field.to_string(),
                messages,
            }),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn copy_errors(&mut self, other: &Notification) {
        for entry in &other.errors {
            self.set_error(entry.messages.clone(), &entry.field);
        }
    }

    pub fn errors(&self) -> &[FieldErrors] {
        &self.errors
    }

    pub fn messages_for(&self, field: &str) -> Option<&[String]> {
        self.errors
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.messages.as_slice())
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Drops every message stored under the given fields.
    pub fn clear_fields(&mut self, fields: &[&str]) {
        self.errors.retain(|entry| !fields.contains(&entry.field.as_str()));
    }

    /// Field-less errors render as plain strings, the rest as `{field: [..]}`.
    pub fn to_json(&self) -> Value {
        let rendered = self
            .errors
            .iter()
            .map(|entry| {
                if entry.messages.len() == 1 && entry.messages[0] == entry.field {
                    Value::String(entry.field.clone())
                } else {
                    let mut object = Map::new();
                    object.insert(
                        entry.field.clone(),
                        Value::Array(entry.messages.iter().cloned().map(Value::String).collect()),
                    );
                    Value::Object(object)
                }
            })
            .collect();
        Value::Array(rendered)
    }

    pub fn to_error(&self) -> EntityValidationError {
        EntityValidationError::new(self.errors.clone())
    }
}
