use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OpError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Masculine,
    #[serde(rename = "F")]
    Feminine,
}

impl Sex {
    pub fn label(self) -> char {
        match self {
            Sex::Masculine => 'M',
            Sex::Feminine => 'F',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'M' => Ok(Sex::Masculine),
            'F' => Ok(Sex::Feminine),
            _ => Err(OpError::validation("modality", c)),
        }
    }

    pub fn is_masculine(self) -> bool {
        self == Sex::Masculine
    }
}

/// Two-letter modality: the first letter applies to the sensory/intuition
/// coin, the second to the extroverted-decider coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Modality {
    pub sensory: Sex,
    pub de: Sex,
}

impl Modality {
    pub fn new(sensory: Sex, de: Sex) -> Self {
        Self { sensory, de }
    }

    pub fn from_label(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.trim().chars().collect();
        match chars.as_slice() {
            [a, b] => Ok(Self {
                sensory: Sex::from_char(*a).map_err(|_| OpError::validation("modality", s))?,
                de: Sex::from_char(*b).map_err(|_| OpError::validation("modality", s))?,
            }),
            _ => Err(OpError::validation("modality", s)),
        }
    }

    pub fn label(self) -> String {
        format!("{}{}", self.sensory.label(), self.de.label())
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.sensory.label(), self.de.label())
    }
}

impl From<Modality> for String {
    fn from(m: Modality) -> Self {
        m.label()
    }
}

impl TryFrom<String> for Modality {
    type Error = OpError;

    fn try_from(s: String) -> Result<Self> {
        Modality::from_label(&s)
    }
}
