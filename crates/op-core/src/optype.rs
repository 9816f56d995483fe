//! Derivation of a complete OP type from partial seed input.
//!
//! Derivation is all-or-nothing: every input is validated before any field of
//! the result exists, so a failed call never yields a partial snapshot.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::animal::{Animal, AnimalStack};
use crate::axis::Axis;
use crate::charge::Charge;
use crate::error::{OpError, Result};
use crate::function::CognitiveFunction;
use crate::letter::Letter;
use crate::modality::{Modality, Sex};
use crate::position::GrantOrder;
use crate::quadra::Quadra;
use crate::social::SocialType;

/// Raw ingredients of a type. The observer and decider must carry their
/// letters; a missing charge is filled from the first animal of the stack.
/// The animal the savior pair forms must be one of the first two animals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpTypeSeed {
    pub observer: CognitiveFunction,
    pub decider: CognitiveFunction,
    pub is_single_observer: bool,
    pub modality: Modality,
    pub animal_stack: AnimalStack,
    pub social_type: SocialType,
}

impl OpTypeSeed {
    pub fn from_labels(
        observer: &str,
        decider: &str,
        is_single_observer: bool,
        modality: &str,
        animal_stack: &str,
        social_type: &str,
    ) -> Result<Self> {
        Ok(Self {
            observer: CognitiveFunction::from_label(observer)?,
            decider: CognitiveFunction::from_label(decider)?,
            is_single_observer,
            modality: Modality::from_label(modality)?,
            animal_stack: AnimalStack::parse(animal_stack)?,
            social_type: SocialType::from_label(social_type)?,
        })
    }

    /// A uniformly drawn seed that always derives.
    pub fn random(rng: &mut impl Rng) -> Self {
        let observer_letter = if rng.random_bool(0.5) {
            Letter::Sensing
        } else {
            Letter::Intuiting
        };
        let decider_letter = if rng.random_bool(0.5) {
            Letter::Feeling
        } else {
            Letter::Thinking
        };
        let observer_charge = Charge::ALL[rng.random_range(0..2)];
        let observer = CognitiveFunction::new(observer_letter, observer_charge);
        let decider = CognitiveFunction::new(decider_letter, observer_charge.opposite());

        // Opposite charges on the savior pair always form an info animal; the
        // second savior animal is one of the energy animals.
        let savior = match observer_charge {
            Charge::Extroverted => Animal::Consume,
            Charge::Introverted => Animal::Blast,
        };
        let mut partners = [Animal::Sleep, Animal::Play];
        partners.shuffle(rng);
        let mut saviors = [savior, partners[0]];
        saviors.shuffle(rng);
        let mut rest = [partners[1], savior.opposite()];
        rest.shuffle(rng);

        let modality = Modality::new(random_sex(rng), random_sex(rng));

        Self {
            observer,
            decider,
            is_single_observer: rng.random_bool(0.5),
            modality,
            animal_stack: AnimalStack([saviors[0], saviors[1], rest[0], rest[1]]),
            social_type: SocialType::ALL[rng.random_range(0..4)],
        }
    }

    /// Build the full type. See the module docs for the failure contract.
    pub fn derive(&self) -> Result<OpType> {
        let dominant = self.animal_stack.animals()[0];
        let observer = fill_charge(self.observer, Axis::Observing, dominant)?;
        let decider = fill_charge(self.decider, Axis::Deciding, dominant)?;

        let savior_functions = if self.is_single_observer {
            [observer, decider]
        } else {
            [decider, observer]
        };
        let [primary, secondary] = savior_functions;

        let g0 = primary;
        let g1 = if primary.charge() == secondary.charge() {
            secondary.opposite()
        } else {
            secondary
        };
        let grant_stack = [g0, g1, g1.opposite(), g0.opposite()];

        if !g0.can_be_savior_with(&g1) {
            return Err(OpError::validation(
                "savior pair",
                format!("{g0}/{g1}"),
            ));
        }
        for order in GrantOrder::ALL {
            g0.grant_match(order).plus(grant_stack[order.index()])?;
        }

        let savior_animal = Animal::from_functions(&g0, &g1)?;
        if !self.animal_stack.animals()[..2].contains(&savior_animal) {
            return Err(OpError::validation(
                "animal stack",
                format!(
                    "{} (the savior pair {g0}/{g1} forms {savior_animal})",
                    self.animal_stack
                ),
            ));
        }

        let quadra = Quadra::from_members(&[
            primary,
            secondary,
            primary.opposite(),
            secondary.opposite(),
        ])?;

        let masculine_functions = [
            if self.modality.sensory.is_masculine() {
                quadra.sensing()
            } else {
                quadra.intuition()
            },
            if self.modality.de.is_masculine() {
                quadra.de()
            } else {
                quadra.di()
            },
        ];

        Ok(OpType {
            quadra,
            is_single_observer: self.is_single_observer,
            grant_stack,
            savior_functions,
            savior_animal,
            animal_stack: self.animal_stack,
            double_activated_animal: self.animal_stack.last().opposite(),
            masculine_functions,
            modality: self.modality,
            social_type: self.social_type,
            social_stack: self.social_type.stack(),
        })
    }
}

fn random_sex(rng: &mut impl Rng) -> Sex {
    if rng.random_bool(0.5) {
        Sex::Masculine
    } else {
        Sex::Feminine
    }
}

fn fill_charge(function: CognitiveFunction, axis: Axis, dominant: Animal) -> Result<CognitiveFunction> {
    if function.axis() != axis {
        return Err(OpError::IncompatibleAxis {
            expected: axis,
            found: function.axis(),
        });
    }
    if function.letter().is_none() {
        return Err(OpError::validation("seed function", function.label()));
    }
    if function.charge().is_some() {
        return Ok(function);
    }
    let need = match axis {
        Axis::Observing => dominant.observing_need(),
        Axis::Deciding => dominant.deciding_need(),
    };
    function.plus_human_need(need, false)
}

/// A complete, validated type snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpType {
    quadra: Quadra,
    is_single_observer: bool,
    grant_stack: [CognitiveFunction; 4],
    savior_functions: [CognitiveFunction; 2],
    savior_animal: Animal,
    animal_stack: AnimalStack,
    double_activated_animal: Animal,
    masculine_functions: [CognitiveFunction; 2],
    modality: Modality,
    social_type: SocialType,
    social_stack: [Animal; 4],
}

impl OpType {
    pub fn quadra(&self) -> Quadra {
        self.quadra
    }

    pub fn is_single_observer(&self) -> bool {
        self.is_single_observer
    }

    pub fn grant_stack(&self) -> &[CognitiveFunction; 4] {
        &self.grant_stack
    }

    pub fn savior_functions(&self) -> &[CognitiveFunction; 2] {
        &self.savior_functions
    }

    pub fn animal_stack(&self) -> &AnimalStack {
        &self.animal_stack
    }

    pub fn double_activated_animal(&self) -> Animal {
        self.double_activated_animal
    }

    pub fn masculine_functions(&self) -> &[CognitiveFunction; 2] {
        &self.masculine_functions
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn social_type(&self) -> SocialType {
        self.social_type
    }

    pub fn social_stack(&self) -> &[Animal; 4] {
        &self.social_stack
    }

    pub fn is_masculine(&self, function: &CognitiveFunction) -> bool {
        self.masculine_functions.contains(function)
    }

    /// The animal grant orders 0 and 1 form. Always one of the first two
    /// animals of the stack.
    pub fn savior_animal(&self) -> Animal {
        self.savior_animal
    }

    /// The seed this type derives from, with charges filled in.
    pub fn seed(&self) -> OpTypeSeed {
        let [a, b] = self.savior_functions;
        let (observer, decider) = if a.axis() == Axis::Observing { (a, b) } else { (b, a) };
        OpTypeSeed {
            observer,
            decider,
            is_single_observer: self.is_single_observer,
            modality: self.modality,
            animal_stack: self.animal_stack,
            social_type: self.social_type,
        }
    }

    /// Short human-readable rendering, e.g. `"FM-Fi/Se-CS/B(P) #1 gamma"`.
    pub fn summary(&self) -> String {
        let [a, b] = self.savior_functions;
        format!(
            "{}-{a}/{b}-{} {} {}",
            self.modality, self.animal_stack, self.social_type, self.quadra
        )
    }
}
