use std::fmt;

use super::errors::InvalidIdentifierError;

// ============================================================================
// Value Objects
// ============================================================================
//
// Value objects are immutable and compared by every field. Deriving
// PartialEq gives structural equality, and the type system already refuses
// to compare two different concrete types.
//
// ============================================================================

pub trait ValueObject: Clone + PartialEq + fmt::Debug {}

/// Checks the canonical `8-4-4-4-12` hyphenated layout before parsing.
pub fn parse_uuid(value: &str) -> Result<uuid::Uuid, InvalidIdentifierError> {
    let canonical = value.len() == 36
        && value
            .char_indices()
            .all(|(i, c)| match i {
                8 | 13 | 18 | 23 => c == '-',
                _ => c.is_ascii_hexdigit(),
            });

    if !canonical {
        return Err(InvalidIdentifierError(value.to_string()));
    }

    uuid::Uuid::parse_str(value).map_err(|_| InvalidIdentifierError(value.to_string()))
}

/// Declares a typed identifier backed by a v4 UUID.
///
/// Two identifiers are equal iff their string forms match.
#[macro_export]
macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            pub fn parse(
                value: &str,
            ) -> Result<Self, $crate::seedwork::domain::InvalidIdentifierError> {
                $crate::seedwork::domain::parse_uuid(value).map(Self)
            }

            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::seedwork::domain::InvalidIdentifierError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl $crate::seedwork::domain::ValueObject for $name {}
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::identifier!(TestId);

    #[test]
    fn test_generated_identifier_round_trips_through_parse() {
        let id = TestId::new();
        let parsed = TestId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn test_invalid_identifier_is_rejected() {
        for value in ["fake id", "", "00000000000000000000000000000000", "{9366b7dc-2d71-4799-b91c-c64adb205104}"] {
            let err = TestId::parse(value).unwrap_err();
            assert_eq!(err, InvalidIdentifierError(value.to_string()));
        }
    }

    #[test]
    fn test_identifiers_compare_by_string_form() {
        let raw = "9366b7dc-2d71-4799-b91c-c64adb205104";
        assert_eq!(TestId::parse(raw).unwrap(), TestId::parse(raw).unwrap());
        assert_ne!(TestId::parse(raw).unwrap(), TestId::new());
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Money {
        amount: i64,
        currency: String,
    }

    impl ValueObject for Money {}

    #[test]
    fn test_value_object_structural_equality() {
        let a = Money { amount: 10, currency: "BRL".into() };
        let b = Money { amount: 10, currency: "BRL".into() };
        let c = Money { amount: 10, currency: "USD".into() };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
