//! Cognitive functions: the compound value every other concept hangs off.
//!
//! A function always knows its axis. Its letter and charge may be unknown,
//! which the label grammar spells as an axis character in place of the letter
//! (`"D?"`, `"Oi"`) and `'?'` in place of the charge (`"N?"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::charge::Charge;
use crate::error::{OpError, Result};
use crate::letter::Letter;
use crate::need::HumanNeed;
use crate::position::GrantOrder;
use crate::scope::RealityScope;

/// Placeholder for an unknown charge in labels.
pub const UNKNOWN_CHARGE: char = '?';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CognitiveFunction {
    axis: Axis,
    letter: Option<Letter>,
    charge: Option<Charge>,
}

/// Anything that can be merged into a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    Charge(Charge),
    Need(HumanNeed),
    Letter(Letter),
    Function(CognitiveFunction),
}

impl Component {
    fn axis(self) -> Option<Axis> {
        match self {
            Component::Charge(_) => None,
            Component::Need(n) => Some(n.axis()),
            Component::Letter(l) => Some(l.axis()),
            Component::Function(f) => Some(f.axis()),
        }
    }

    fn letter(self) -> Option<Letter> {
        match self {
            Component::Letter(l) => Some(l),
            Component::Function(f) => f.letter(),
            Component::Charge(_) | Component::Need(_) => None,
        }
    }

    fn charge(self) -> Option<Charge> {
        match self {
            Component::Charge(c) => Some(c),
            Component::Need(n) => Some(n.charge()),
            Component::Function(f) => f.charge(),
            Component::Letter(_) => None,
        }
    }
}

impl From<Charge> for Component {
    fn from(c: Charge) -> Self {
        Component::Charge(c)
    }
}

impl From<HumanNeed> for Component {
    fn from(n: HumanNeed) -> Self {
        Component::Need(n)
    }
}

impl From<Letter> for Component {
    fn from(l: Letter) -> Self {
        Component::Letter(l)
    }
}

impl From<CognitiveFunction> for Component {
    fn from(f: CognitiveFunction) -> Self {
        Component::Function(f)
    }
}

impl CognitiveFunction {
    /// A fully specified function.
    pub fn new(letter: Letter, charge: Charge) -> Self {
        Self {
            axis: letter.axis(),
            letter: Some(letter),
            charge: Some(charge),
        }
    }

    /// A function that only knows its axis.
    pub fn unknown(axis: Axis) -> Self {
        Self {
            axis,
            letter: None,
            charge: None,
        }
    }

    pub fn from_parts(axis: Axis, letter: Option<Letter>, charge: Option<Charge>) -> Result<Self> {
        if let Some(l) = letter
            && l.axis() != axis
        {
            return Err(OpError::IncompatibleAxis {
                expected: axis,
                found: l.axis(),
            });
        }
        Ok(Self {
            axis,
            letter,
            charge,
        })
    }

    /// Parse `(Letter|Axis)(Charge|'?')?`. Case is normalized and a missing
    /// charge reads as unknown.
    pub fn from_label(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.is_empty() || chars.len() > 2 {
            return Err(OpError::InvalidLength(s.to_string()));
        }

        let head = chars[0].to_ascii_uppercase();
        let (axis, letter) = match Letter::from_char(head) {
            Ok(l) => (l.axis(), Some(l)),
            Err(_) => match Axis::from_char(head) {
                Ok(a) => (a, None),
                Err(_) => return Err(OpError::InvalidLetter(chars[0])),
            },
        };

        let charge = match chars.get(1).map(|c| c.to_ascii_lowercase()) {
            None | Some(UNKNOWN_CHARGE) => None,
            Some(c) => Some(Charge::from_char(c).map_err(|_| OpError::InvalidCharge(chars[1]))?),
        };

        Ok(Self {
            axis,
            letter,
            charge,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn letter(&self) -> Option<Letter> {
        self.letter
    }

    pub fn charge(&self) -> Option<Charge> {
        self.charge
    }

    pub fn reality_scope(&self) -> Option<RealityScope> {
        self.letter.map(Letter::scope)
    }

    pub fn human_need(&self) -> Option<HumanNeed> {
        self.charge.map(|c| self.axis.plus(c))
    }

    pub fn is_partial(&self) -> bool {
        self.letter.is_none() || self.charge.is_none()
    }

    /// Canonical two-character label.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Flip letter and charge where known. The axis never changes.
    pub fn opposite(&self) -> Self {
        Self {
            axis: self.axis,
            letter: self.letter.map(Letter::opposite),
            charge: self.charge.map(Charge::opposite),
        }
    }

    pub fn with_opposite_letter(&self) -> Self {
        Self {
            letter: self.letter.map(Letter::opposite),
            ..*self
        }
    }

    pub fn with_opposite_charge(&self) -> Self {
        Self {
            charge: self.charge.map(Charge::opposite),
            ..*self
        }
    }

    pub fn with_charge(&self, charge: Charge) -> Self {
        Self {
            charge: Some(charge),
            ..*self
        }
    }

    pub fn plus_charge(&self, charge: Charge) -> Result<Self> {
        self.merge(Component::Charge(charge), false, true)
    }

    pub fn with_letter(&self, letter: Letter, ignore_axis: bool) -> Result<Self> {
        self.merge(Component::Letter(letter), ignore_axis, false)
    }

    pub fn plus_letter(&self, letter: Letter, ignore_axis: bool) -> Result<Self> {
        self.merge(Component::Letter(letter), ignore_axis, true)
    }

    pub fn with_human_need(&self, need: HumanNeed, ignore_axis: bool) -> Result<Self> {
        self.merge(Component::Need(need), ignore_axis, false)
    }

    pub fn plus_human_need(&self, need: HumanNeed, ignore_axis: bool) -> Result<Self> {
        self.merge(Component::Need(need), ignore_axis, true)
    }

    /// Merge `other` in, letting it win on every conflict.
    pub fn injected_with(&self, other: impl Into<Component>, ignore_axis: bool) -> Result<Self> {
        self.merge(other.into(), ignore_axis, false)
    }

    /// Merge `other` in, failing on any disagreement.
    pub fn plus(&self, other: impl Into<Component>) -> Result<Self> {
        self.merge(other.into(), false, true)
    }

    /// The function expected at `order` in a stack whose strongest function is
    /// `self`. Crossing the axis loses the letter.
    ///
    /// ```text
    /// 0: identity
    /// 1: flip axis, flip charge
    /// 2: flip axis, keep charge
    /// 3: opposite (keep axis, flip letter and charge)
    /// ```
    pub fn grant_match(&self, order: GrantOrder) -> Self {
        match order.index() {
            0 => *self,
            1 => self.on_axis(self.axis.opposite()).with_opposite_charge(),
            2 => self.on_axis(self.axis.opposite()),
            _ => self.opposite(),
        }
    }

    /// Functions on different axes always coexist. On the same axis they may
    /// share neither a known letter nor a known charge.
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        if self.axis != other.axis {
            return true;
        }
        !shares(self.letter, other.letter) && !shares(self.charge, other.charge)
    }

    /// Whether `self` and `other` can form the savior pair of a stack: both
    /// fully known, on different axes, with different charges.
    pub fn can_be_savior_with(&self, other: &Self) -> bool {
        !self.is_partial()
            && !other.is_partial()
            && self.axis != other.axis
            && !shares(self.letter, other.letter)
            && !shares(self.charge, other.charge)
    }

    fn on_axis(&self, axis: Axis) -> Self {
        if axis == self.axis {
            *self
        } else {
            Self {
                axis,
                letter: None,
                charge: self.charge,
            }
        }
    }

    fn merge(&self, other: Component, ignore_axis: bool, strict: bool) -> Result<Self> {
        let mut base = *self;
        if let Some(axis) = other.axis()
            && axis != self.axis
        {
            if !ignore_axis {
                return Err(OpError::IncompatibleAxis {
                    expected: self.axis,
                    found: axis,
                });
            }
            base = self.on_axis(axis);
        }

        if let Some(letter) = other.letter() {
            if strict
                && let Some(existing) = base.letter
                && existing != letter
            {
                return Err(OpError::conflict("letter", existing, letter));
            }
            base.letter = Some(letter);
        }

        if let Some(charge) = other.charge() {
            if strict
                && let Some(existing) = base.charge
                && existing != charge
            {
                return Err(OpError::conflict("charge", existing, charge));
            }
            base.charge = Some(charge);
        }

        Ok(base)
    }
}

fn shares<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

impl fmt::Display for CognitiveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.letter.map_or(self.axis.label(), Letter::label);
        let tail = self.charge.map_or(UNKNOWN_CHARGE, Charge::label);
        write!(f, "{head}{tail}")
    }
}

impl FromStr for CognitiveFunction {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self> {
        CognitiveFunction::from_label(s)
    }
}

impl From<CognitiveFunction> for String {
    fn from(f: CognitiveFunction) -> Self {
        f.label()
    }
}

impl TryFrom<String> for CognitiveFunction {
    type Error = OpError;

    fn try_from(s: String) -> Result<Self> {
        CognitiveFunction::from_label(&s)
    }
}
