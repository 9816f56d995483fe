use std::fmt;

use serde::{Deserialize, Serialize};

use crate::animal::Animal;
use crate::error::{OpError, Result};
use crate::function::CognitiveFunction;

/// Index into a grant stack, 0 (strongest) through 3 (weakest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct GrantOrder(u8);

impl GrantOrder {
    pub const ALL: [GrantOrder; 4] = [GrantOrder(0), GrantOrder(1), GrantOrder(2), GrantOrder(3)];

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The order whose function is this order's opposite: 0↔3, 1↔2.
    pub fn opposite(self) -> Self {
        GrantOrder(3 - self.0)
    }

    /// Orders 0 and 1 hold the savior functions.
    pub fn is_savior(self) -> bool {
        self.0 < 2
    }
}

impl TryFrom<usize> for GrantOrder {
    type Error = OpError;

    fn try_from(i: usize) -> Result<Self> {
        if i < 4 {
            Ok(GrantOrder(i as u8))
        } else {
            Err(OpError::InvalidGrantOrder(i))
        }
    }
}

impl From<GrantOrder> for usize {
    fn from(order: GrantOrder) -> Self {
        order.index()
    }
}

impl fmt::Display for GrantOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four animal slots of a grant stack. Each pairs an observing and
/// a deciding grant order; the same-axis diagonals (0,3) and (1,2) never form
/// a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalGrantPosition {
    StrongerInfo,
    StrongerEnergy,
    WeakerInfo,
    WeakerEnergy,
}

impl AnimalGrantPosition {
    pub const ALL: [AnimalGrantPosition; 4] = [
        AnimalGrantPosition::StrongerInfo,
        AnimalGrantPosition::StrongerEnergy,
        AnimalGrantPosition::WeakerInfo,
        AnimalGrantPosition::WeakerEnergy,
    ];

    pub fn index(self) -> usize {
        match self {
            AnimalGrantPosition::StrongerInfo => 0,
            AnimalGrantPosition::StrongerEnergy => 1,
            AnimalGrantPosition::WeakerInfo => 2,
            AnimalGrantPosition::WeakerEnergy => 3,
        }
    }

    pub fn orders(self) -> (GrantOrder, GrantOrder) {
        let (a, b) = match self {
            AnimalGrantPosition::StrongerInfo => (0, 1),
            AnimalGrantPosition::StrongerEnergy => (0, 2),
            AnimalGrantPosition::WeakerInfo => (2, 3),
            AnimalGrantPosition::WeakerEnergy => (1, 3),
        };
        (GrantOrder(a), GrantOrder(b))
    }

    /// Look up the slot pairing two grant orders, in either order.
    pub fn from_grant_order(a: usize, b: usize) -> Result<Self> {
        let a_order = GrantOrder::try_from(a)?;
        let b_order = GrantOrder::try_from(b)?;
        let (lo, hi) = if a_order <= b_order {
            (a_order, b_order)
        } else {
            (b_order, a_order)
        };
        Self::ALL
            .into_iter()
            .find(|p| p.orders() == (lo, hi))
            .ok_or(OpError::InvalidPosition(a, b))
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimalGrantPosition::StrongerInfo => "STRONGER_INFO",
            AnimalGrantPosition::StrongerEnergy => "STRONGER_ENERGY",
            AnimalGrantPosition::WeakerInfo => "WEAKER_INFO",
            AnimalGrantPosition::WeakerEnergy => "WEAKER_ENERGY",
        }
    }

    /// Accepts the full label (`stronger_info`, `STRONGER-INFO`) or the
    /// short forms `si`, `se`, `wi`, `we`.
    pub fn from_label(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "STRONGER_INFO" | "SI" => Ok(AnimalGrantPosition::StrongerInfo),
            "STRONGER_ENERGY" | "SE" => Ok(AnimalGrantPosition::StrongerEnergy),
            "WEAKER_INFO" | "WI" => Ok(AnimalGrantPosition::WeakerInfo),
            "WEAKER_ENERGY" | "WE" => Ok(AnimalGrantPosition::WeakerEnergy),
            _ => Err(OpError::validation("animal grant position", s)),
        }
    }

    /// The slot built from the opposites of this slot's functions. Its animal
    /// is always the opposite animal.
    pub fn opposite(self) -> Self {
        match self {
            AnimalGrantPosition::StrongerInfo => AnimalGrantPosition::WeakerInfo,
            AnimalGrantPosition::WeakerInfo => AnimalGrantPosition::StrongerInfo,
            AnimalGrantPosition::StrongerEnergy => AnimalGrantPosition::WeakerEnergy,
            AnimalGrantPosition::WeakerEnergy => AnimalGrantPosition::StrongerEnergy,
        }
    }

    pub fn is_info(self) -> bool {
        matches!(
            self,
            AnimalGrantPosition::StrongerInfo | AnimalGrantPosition::WeakerInfo
        )
    }

    pub fn contains(self, order: GrantOrder) -> bool {
        let (a, b) = self.orders();
        a == order || b == order
    }

    /// The animal formed by the functions this slot pairs.
    pub fn animal_in(self, stack: &[CognitiveFunction; 4]) -> Result<Animal> {
        let (a, b) = self.orders();
        Animal::from_functions(&stack[a.index()], &stack[b.index()])
    }
}

impl fmt::Display for AnimalGrantPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_order_bounds() {
        assert!(GrantOrder::try_from(3).is_ok());
        assert!(matches!(
            GrantOrder::try_from(4),
            Err(OpError::InvalidGrantOrder(4))
        ));
    }

    #[test]
    fn test_grant_order_opposite_pairs() {
        let pairs: Vec<(usize, usize)> = GrantOrder::ALL
            .iter()
            .map(|o| (o.index(), o.opposite().index()))
            .collect();
        assert_eq!(pairs, vec![(0, 3), (1, 2), (2, 1), (3, 0)]);
    }

    #[test]
    fn test_from_grant_order() {
        assert_eq!(
            AnimalGrantPosition::from_grant_order(0, 1).unwrap(),
            AnimalGrantPosition::StrongerInfo
        );
        assert_eq!(
            AnimalGrantPosition::from_grant_order(2, 0).unwrap(),
            AnimalGrantPosition::StrongerEnergy
        );
        assert_eq!(
            AnimalGrantPosition::from_grant_order(2, 3).unwrap(),
            AnimalGrantPosition::WeakerInfo
        );
        assert_eq!(
            AnimalGrantPosition::from_grant_order(1, 3).unwrap(),
            AnimalGrantPosition::WeakerEnergy
        );
    }

    #[test]
    fn test_same_axis_pairs_rejected() {
        for (a, b) in [(0, 3), (1, 2), (3, 0), (2, 1), (1, 1)] {
            assert!(matches!(
                AnimalGrantPosition::from_grant_order(a, b),
                Err(OpError::InvalidPosition(_, _))
            ));
        }
        assert!(matches!(
            AnimalGrantPosition::from_grant_order(0, 7),
            Err(OpError::InvalidGrantOrder(7))
        ));
    }

    #[test]
    fn test_opposite_position_is_disjoint() {
        for p in AnimalGrantPosition::ALL {
            let (a, b) = p.orders();
            let q = p.opposite();
            assert!(!q.contains(a) && !q.contains(b));
            assert_eq!(q.opposite(), p);
            assert_eq!(q.is_info(), p.is_info());
        }
    }

    #[test]
    fn test_label_roundtrip() {
        for p in AnimalGrantPosition::ALL {
            assert_eq!(AnimalGrantPosition::from_label(p.label()).unwrap(), p);
        }
        assert_eq!(
            AnimalGrantPosition::from_label("we").unwrap(),
            AnimalGrantPosition::WeakerEnergy
        );
    }

    #[test]
    fn test_animal_in_stack() {
        let stack = ["Fi", "Se", "Ni", "Te"].map(|s| CognitiveFunction::from_label(s).unwrap());
        assert_eq!(
            AnimalGrantPosition::StrongerInfo.animal_in(&stack).unwrap(),
            Animal::Consume
        );
        assert_eq!(
            AnimalGrantPosition::StrongerEnergy.animal_in(&stack).unwrap(),
            Animal::Sleep
        );
        assert_eq!(
            AnimalGrantPosition::WeakerInfo.animal_in(&stack).unwrap(),
            Animal::Blast
        );
        assert_eq!(
            AnimalGrantPosition::WeakerEnergy.animal_in(&stack).unwrap(),
            Animal::Play
        );
    }
}
