use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{OpError, Result};
use crate::scope::RealityScope;

/// Axis × RealityScope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    #[serde(rename = "S")]
    Sensing,
    #[serde(rename = "N")]
    Intuiting,
    #[serde(rename = "F")]
    Feeling,
    #[serde(rename = "T")]
    Thinking,
}

impl Letter {
    pub const ALL: [Letter; 4] = [
        Letter::Sensing,
        Letter::Intuiting,
        Letter::Feeling,
        Letter::Thinking,
    ];

    pub fn label(self) -> char {
        match self {
            Letter::Sensing => 'S',
            Letter::Intuiting => 'N',
            Letter::Feeling => 'F',
            Letter::Thinking => 'T',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'S' => Ok(Letter::Sensing),
            'N' => Ok(Letter::Intuiting),
            'F' => Ok(Letter::Feeling),
            'T' => Ok(Letter::Thinking),
            _ => Err(OpError::validation("letter", c)),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Letter::Sensing | Letter::Intuiting => Axis::Observing,
            Letter::Feeling | Letter::Thinking => Axis::Deciding,
        }
    }

    pub fn scope(self) -> RealityScope {
        match self {
            Letter::Sensing | Letter::Feeling => RealityScope::Concrete,
            Letter::Intuiting | Letter::Thinking => RealityScope::Abstract,
        }
    }

    /// Flip scope, keep axis: S↔N, F↔T.
    pub fn opposite(self) -> Self {
        self.scope().opposite().letter(self.axis())
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
