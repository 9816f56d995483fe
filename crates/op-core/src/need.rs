use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::charge::Charge;
use crate::error::{OpError, Result};

/// Axis × Charge. Exactly four values exist: Self (Di), Tribe (De),
/// Organize (Oi) and Gather (Oe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HumanNeed {
    axis: Axis,
    charge: Charge,
}

impl HumanNeed {
    pub const SELF: HumanNeed = HumanNeed::new(Axis::Deciding, Charge::Introverted);
    pub const TRIBE: HumanNeed = HumanNeed::new(Axis::Deciding, Charge::Extroverted);
    pub const ORGANIZE: HumanNeed = HumanNeed::new(Axis::Observing, Charge::Introverted);
    pub const GATHER: HumanNeed = HumanNeed::new(Axis::Observing, Charge::Extroverted);

    pub const ALL: [HumanNeed; 4] = [
        HumanNeed::SELF,
        HumanNeed::TRIBE,
        HumanNeed::ORGANIZE,
        HumanNeed::GATHER,
    ];

    pub const fn new(axis: Axis, charge: Charge) -> Self {
        Self { axis, charge }
    }

    pub fn axis(self) -> Axis {
        self.axis
    }

    pub fn charge(self) -> Charge {
        self.charge
    }

    /// Two-character label, e.g. `"Di"`.
    pub fn label(self) -> String {
        format!("{}{}", self.axis.label(), self.charge.label())
    }

    pub fn name(self) -> &'static str {
        match (self.axis, self.charge) {
            (Axis::Deciding, Charge::Introverted) => "Self",
            (Axis::Deciding, Charge::Extroverted) => "Tribe",
            (Axis::Observing, Charge::Introverted) => "Organize",
            (Axis::Observing, Charge::Extroverted) => "Gather",
        }
    }

    pub fn from_label(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(c), None) => {
                let axis = Axis::from_char(a).map_err(|_| OpError::validation("human need", s))?;
                let charge =
                    Charge::from_char(c).map_err(|_| OpError::validation("human need", s))?;
                Ok(HumanNeed::new(axis, charge))
            }
            _ => Err(OpError::validation("human need", s)),
        }
    }

    /// Same axis, flipped charge.
    pub fn opposite(self) -> Self {
        HumanNeed::new(self.axis, self.charge.opposite())
    }
}

impl fmt::Display for HumanNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.axis.label(), self.charge.label())
    }
}

impl From<HumanNeed> for String {
    fn from(need: HumanNeed) -> Self {
        need.label()
    }
}

impl TryFrom<String> for HumanNeed {
    type Error = OpError;

    fn try_from(s: String) -> Result<Self> {
        HumanNeed::from_label(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_singletons() {
        assert_eq!(HumanNeed::SELF.label(), "Di");
        assert_eq!(HumanNeed::TRIBE.label(), "De");
        assert_eq!(HumanNeed::ORGANIZE.label(), "Oi");
        assert_eq!(HumanNeed::GATHER.label(), "Oe");
        assert_eq!(HumanNeed::ORGANIZE.name(), "Organize");
    }

    #[test]
    fn test_label_roundtrip() {
        for need in HumanNeed::ALL {
            assert_eq!(HumanNeed::from_label(&need.label()).unwrap(), need);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "D", "Dx", "Xi", "Die"] {
            assert!(HumanNeed::from_label(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&HumanNeed::TRIBE).unwrap();
        assert_eq!(json, "\"De\"");
        let back: HumanNeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HumanNeed::TRIBE);
    }
}
