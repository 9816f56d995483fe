use std::fmt;

use serde::{Deserialize, Serialize};

use crate::animal::Animal;
use crate::error::{OpError, Result};

/// Social type tag `#1`..`#4`. Each selects a rotation of the base animal
/// order Sleep, Consume, Blast, Play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SocialType(u8);

impl SocialType {
    pub const ALL: [SocialType; 4] = [SocialType(1), SocialType(2), SocialType(3), SocialType(4)];

    pub fn from_label(s: &str) -> Result<Self> {
        match s.trim() {
            "#1" => Ok(SocialType(1)),
            "#2" => Ok(SocialType(2)),
            "#3" => Ok(SocialType(3)),
            "#4" => Ok(SocialType(4)),
            _ => Err(OpError::validation("social type", s)),
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        format!("#{}", self.0)
    }

    pub fn stack(self) -> [Animal; 4] {
        let start = (self.0 - 1) as usize;
        std::array::from_fn(|i| Animal::ALL[(start + i) % 4])
    }
}

impl fmt::Display for SocialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<SocialType> for String {
    fn from(t: SocialType) -> Self {
        t.label()
    }
}

impl TryFrom<String> for SocialType {
    type Error = OpError;

    fn try_from(s: String) -> Result<Self> {
        SocialType::from_label(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacks_are_rotations() {
        let rendered: Vec<String> = SocialType::ALL
            .iter()
            .map(|t| t.stack().iter().map(|a| a.letter()).collect())
            .collect();
        assert_eq!(rendered, vec!["SCBP", "CBPS", "BPSC", "PSCB"]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SocialType::from_label("#3").unwrap().number(), 3);
        for bad in ["#0", "#5", "3", ""] {
            assert!(SocialType::from_label(bad).is_err(), "{bad}");
        }
    }
}
