use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OpError, Result};

/// Direction of a function's energy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charge {
    #[serde(rename = "i")]
    Introverted,
    #[serde(rename = "e")]
    Extroverted,
}

impl Charge {
    pub const ALL: [Charge; 2] = [Charge::Introverted, Charge::Extroverted];

    pub fn label(self) -> char {
        match self {
            Charge::Introverted => 'i',
            Charge::Extroverted => 'e',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'i' => Ok(Charge::Introverted),
            'e' => Ok(Charge::Extroverted),
            _ => Err(OpError::validation("charge", c)),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Charge::Introverted => Charge::Extroverted,
            Charge::Extroverted => Charge::Introverted,
        }
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
