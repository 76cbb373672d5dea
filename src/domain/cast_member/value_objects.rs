use std::fmt;

use serde::{Deserialize, Serialize};

use crate::seedwork::domain::{InvalidArgumentError, ValueObject};

crate::identifier!(
    /// Cast member identifier
    CastMemberId
);

/// Role of a cast member. Commands carry it as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastMemberType {
    Director,
    Actor,
}

impl CastMemberType {
    pub fn code(&self) -> u8 {
        match self {
            CastMemberType::Director => 1,
            CastMemberType::Actor => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, InvalidArgumentError> {
        match code {
            1 => Ok(CastMemberType::Director),
            2 => Ok(CastMemberType::Actor),
            other => Err(InvalidArgumentError(format!("Invalid cast member type: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CastMemberType::Director => "director",
            CastMemberType::Actor => "actor",
        }
    }
}

impl fmt::Display for CastMemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValueObject for CastMemberType {}
