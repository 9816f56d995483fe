//! Consistency checks over the engine's current cells.
//!
//! Edits never refuse to produce these states; the checks report them so a
//! consumer can highlight the offending cells.

use std::fmt;

use serde::Serialize;

use crate::animal::Animal;
use crate::engine::CoinEngine;
use crate::position::{AnimalGrantPosition, GrantOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "conflict", rename_all = "camelCase")]
pub enum Conflict {
    /// Both savior functions carry the same charge.
    SaviorCharges,
    /// A stack order is assigned where the functions form no animal yet.
    UnformedAnimal { position: AnimalGrantPosition },
    /// The two savior animals are both info or both energy animals.
    SaviorAnimalsSameKind { first: Animal, second: Animal },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::SaviorCharges => f.write_str("savior functions share a charge"),
            Conflict::UnformedAnimal { position } => {
                write!(f, "{position} is ordered but forms no animal")
            }
            Conflict::SaviorAnimalsSameKind { first, second } => {
                let kind = if first.is_info() { "info" } else { "energy" };
                write!(f, "savior animals {first} and {second} are both {kind}")
            }
        }
    }
}

impl CoinEngine {
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        let first = self.function_cell(GrantOrder::ALL[0]).function.charge();
        let second = self.function_cell(GrantOrder::ALL[1]).function.charge();
        if first.is_some() && first == second {
            conflicts.push(Conflict::SaviorCharges);
        }

        let mut by_order: [Option<Animal>; 4] = [None; 4];
        for position in AnimalGrantPosition::ALL {
            let coin = self.animal_cell(position);
            let animal = self.animal_at(position);
            if let Some(order) = coin.order {
                if animal.is_none() {
                    conflicts.push(Conflict::UnformedAnimal { position });
                }
                if let Some(slot) = by_order.get_mut(order) {
                    *slot = animal;
                }
            }
        }

        if let [Some(a), Some(b), ..] = by_order
            && a.is_info() == b.is_info()
        {
            conflicts.push(Conflict::SaviorAnimalsSameKind {
                first: a,
                second: b,
            });
        }

        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::CognitiveFunction;
    use crate::optype::OpTypeSeed;

    fn gamma_engine() -> CoinEngine {
        let t = OpTypeSeed::from_labels("Se", "Fi", false, "FM", "CS/B(P)", "#1")
            .unwrap()
            .derive()
            .unwrap();
        CoinEngine::from_op_type(&t)
    }

    #[test]
    fn test_derived_type_has_no_conflicts() {
        assert!(gamma_engine().conflicts().is_empty());
    }

    #[test]
    fn test_blank_engine_has_no_conflicts() {
        assert!(CoinEngine::new().conflicts().is_empty());
    }

    #[test]
    fn test_savior_charges() {
        let mut engine = CoinEngine::from_seed(CognitiveFunction::from_label("Fi").unwrap());
        engine.switch_charge(0).unwrap();
        assert_eq!(engine.conflicts(), vec![Conflict::SaviorCharges]);
    }

    #[test]
    fn test_unformed_animal() {
        let mut engine = CoinEngine::new();
        engine.set_animal_order(AnimalGrantPosition::WeakerInfo).unwrap();
        assert_eq!(
            engine.conflicts(),
            vec![Conflict::UnformedAnimal {
                position: AnimalGrantPosition::WeakerInfo
            }]
        );
    }

    #[test]
    fn test_savior_animals_same_kind() {
        let mut engine = gamma_engine();
        engine.reset_animals().unwrap();
        // Consume then Blast: two info animals
        engine.set_animal_order(AnimalGrantPosition::StrongerInfo).unwrap();
        engine.set_animal_order(AnimalGrantPosition::WeakerInfo).unwrap();
        let conflicts = engine.conflicts();
        assert_eq!(
            conflicts,
            vec![Conflict::SaviorAnimalsSameKind {
                first: Animal::Consume,
                second: Animal::Blast,
            }]
        );
        assert_eq!(conflicts[0].to_string(), "savior animals C and B are both info");
    }
}
