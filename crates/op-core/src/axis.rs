use std::fmt;

use serde::{Deserialize, Serialize};

use crate::charge::Charge;
use crate::error::{OpError, Result};
use crate::need::HumanNeed;

/// Which half of cognition a function works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "O")]
    Observing,
    #[serde(rename = "D")]
    Deciding,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Observing, Axis::Deciding];

    pub fn label(self) -> char {
        match self {
            Axis::Observing => 'O',
            Axis::Deciding => 'D',
        }
    }

    /// Parse `'O'` or `'D'` (case-insensitive).
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'O' => Ok(Axis::Observing),
            'D' => Ok(Axis::Deciding),
            _ => Err(OpError::validation("axis", c)),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Axis::Observing => Axis::Deciding,
            Axis::Deciding => Axis::Observing,
        }
    }

    /// Axis and charge together name a human need.
    pub fn plus(self, charge: Charge) -> HumanNeed {
        HumanNeed::new(self, charge)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
