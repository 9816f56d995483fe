use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::{OpError, Result};
use crate::letter::Letter;

/// Concrete (S/F) versus abstract (N/T) letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RealityScope {
    #[serde(rename = "SF")]
    Concrete,
    #[serde(rename = "NT")]
    Abstract,
}

impl RealityScope {
    pub const ALL: [RealityScope; 2] = [RealityScope::Concrete, RealityScope::Abstract];

    pub fn label(self) -> &'static str {
        match self {
            RealityScope::Concrete => "SF",
            RealityScope::Abstract => "NT",
        }
    }

    pub fn from_label(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SF" => Ok(RealityScope::Concrete),
            "NT" => Ok(RealityScope::Abstract),
            _ => Err(OpError::validation("reality scope", s)),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            RealityScope::Concrete => RealityScope::Abstract,
            RealityScope::Abstract => RealityScope::Concrete,
        }
    }

    /// The letter this scope takes on the given axis.
    pub fn letter(self, axis: Axis) -> Letter {
        match (self, axis) {
            (RealityScope::Concrete, Axis::Observing) => Letter::Sensing,
            (RealityScope::Concrete, Axis::Deciding) => Letter::Feeling,
            (RealityScope::Abstract, Axis::Observing) => Letter::Intuiting,
            (RealityScope::Abstract, Axis::Deciding) => Letter::Thinking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_per_axis() {
        assert_eq!(RealityScope::Concrete.letter(Axis::Observing), Letter::Sensing);
        assert_eq!(RealityScope::Concrete.letter(Axis::Deciding), Letter::Feeling);
        assert_eq!(RealityScope::Abstract.letter(Axis::Observing), Letter::Intuiting);
        assert_eq!(RealityScope::Abstract.letter(Axis::Deciding), Letter::Thinking);
    }

    #[test]
    fn test_label_roundtrip() {
        for scope in RealityScope::ALL {
            assert_eq!(RealityScope::from_label(scope.label()).unwrap(), scope);
        }
        assert!(RealityScope::from_label("ST").is_err());
    }
}
