use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review state of a job application.
///
/// Every application starts as `Pending`; only the company that owns the
/// application may move it to another state.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum ApplicationStatus {
    /// Submitted and awaiting a decision.
    #[default]
    Pending,
    /// Accepted by the company.
    Accepted,
    /// Rejected by the company.
    Rejected,
}

impl ApplicationStatus {
    /// All possible status values.
    pub const ALL: &'static [ApplicationStatus] = &[Self::Pending, Self::Accepted, Self::Rejected];

    /// Returns true once the company has made a decision.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the string representation (PascalCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{invalid}'. Valid values: Pending, Accepted, Rejected")]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
