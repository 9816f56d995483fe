use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::charge::Charge;
use crate::error::{OpError, Result};
use crate::function::CognitiveFunction;
use crate::need::HumanNeed;

static STACK_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,/()]+").unwrap());

/// An observing need paired with a deciding need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Animal {
    /// Oi + Di
    Sleep,
    /// Oe + Di
    Consume,
    /// Oi + De
    Blast,
    /// Oe + De
    Play,
}

impl Animal {
    pub const ALL: [Animal; 4] = [Animal::Sleep, Animal::Consume, Animal::Blast, Animal::Play];

    pub fn observing_need(self) -> HumanNeed {
        match self {
            Animal::Sleep | Animal::Blast => HumanNeed::ORGANIZE,
            Animal::Consume | Animal::Play => HumanNeed::GATHER,
        }
    }

    pub fn deciding_need(self) -> HumanNeed {
        match self {
            Animal::Sleep | Animal::Consume => HumanNeed::SELF,
            Animal::Blast | Animal::Play => HumanNeed::TRIBE,
        }
    }

    /// Build the animal from one observing and one deciding need, given in
    /// either order.
    pub fn from_human_needs(a: HumanNeed, b: HumanNeed) -> Result<Self> {
        if a.axis() == b.axis() {
            return Err(OpError::IncompatibleAxis {
                expected: a.axis().opposite(),
                found: b.axis(),
            });
        }
        let (o, d) = if a.axis() == Axis::Observing {
            (a, b)
        } else {
            (b, a)
        };
        Ok(match (o.charge(), d.charge()) {
            (Charge::Introverted, Charge::Introverted) => Animal::Sleep,
            (Charge::Extroverted, Charge::Introverted) => Animal::Consume,
            (Charge::Introverted, Charge::Extroverted) => Animal::Blast,
            (Charge::Extroverted, Charge::Extroverted) => Animal::Play,
        })
    }

    /// The animal two functions form. Both charges must be known.
    pub fn from_functions(a: &CognitiveFunction, b: &CognitiveFunction) -> Result<Self> {
        match (a.human_need(), b.human_need()) {
            (Some(x), Some(y)) => Animal::from_human_needs(x, y),
            _ => Err(OpError::validation(
                "animal functions",
                format!("{a}+{b}"),
            )),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Animal::Sleep => 'S',
            Animal::Consume => 'C',
            Animal::Blast => 'B',
            Animal::Play => 'P',
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            Animal::Sleep => "Sleep",
            Animal::Consume => "Consume",
            Animal::Blast => "Blast",
            Animal::Play => "Play",
        }
    }

    /// Single letter or full word, any case.
    pub fn from_label(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Animal::ALL
            .into_iter()
            .find(|a| {
                trimmed.eq_ignore_ascii_case(a.word())
                    || (trimmed.len() == 1
                        && trimmed.eq_ignore_ascii_case(&a.letter().to_string()))
            })
            .ok_or_else(|| OpError::validation("animal", s))
    }

    /// Diagonal opposite: both needs flip charge.
    pub fn opposite(self) -> Self {
        match self {
            Animal::Sleep => Animal::Play,
            Animal::Play => Animal::Sleep,
            Animal::Consume => Animal::Blast,
            Animal::Blast => Animal::Consume,
        }
    }

    /// Consume and Blast mix charges and carry information.
    pub fn is_info(self) -> bool {
        matches!(self, Animal::Consume | Animal::Blast)
    }

    pub fn is_energy(self) -> bool {
        !self.is_info()
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl From<Animal> for String {
    fn from(a: Animal) -> Self {
        a.letter().to_string()
    }
}

impl TryFrom<String> for Animal {
    type Error = OpError;

    fn try_from(s: String) -> Result<Self> {
        Animal::from_label(&s)
    }
}

/// All four animals ranked from strongest to weakest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AnimalStack(pub(crate) [Animal; 4]);

impl AnimalStack {
    pub fn new(animals: [Animal; 4]) -> Result<Self> {
        for (i, a) in animals.iter().enumerate() {
            if animals[..i].contains(a) {
                let rendered: String = animals.iter().map(|a| a.letter()).collect();
                return Err(OpError::validation("animal stack", rendered));
            }
        }
        Ok(Self(animals))
    }

    /// Parse `"SCBP"`, `"SC/B(P)"` or four labels separated by whitespace,
    /// commas or slashes.
    pub fn parse(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = STACK_SEPARATORS
            .split(s.trim())
            .filter(|t| !t.is_empty())
            .collect();

        let mut animals = Vec::with_capacity(4);
        for token in tokens {
            match Animal::from_label(token) {
                Ok(a) => animals.push(a),
                Err(_) if token.chars().all(|c| c.is_ascii_alphabetic()) => {
                    for c in token.chars() {
                        animals.push(
                            Animal::from_label(&c.to_string())
                                .map_err(|_| OpError::validation("animal stack", s))?,
                        );
                    }
                }
                Err(_) => return Err(OpError::validation("animal stack", s)),
            }
        }

        let animals: [Animal; 4] = animals
            .try_into()
            .map_err(|_| OpError::validation("animal stack", s))?;
        Self::new(animals)
    }

    pub fn animals(&self) -> &[Animal; 4] {
        &self.0
    }

    pub fn get(&self, order: usize) -> Option<Animal> {
        self.0.get(order).copied()
    }

    pub fn last(&self) -> Animal {
        self.0[3]
    }

    pub fn position_of(&self, animal: Animal) -> usize {
        self.0.iter().position(|a| *a == animal).unwrap_or(3)
    }

    /// Compact notation, e.g. `"SC/B(P)"`.
    pub fn label(&self) -> String {
        let [a, b, c, d] = self.0;
        format!("{a}{b}/{c}({d})")
    }
}

impl fmt::Display for AnimalStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<AnimalStack> for String {
    fn from(stack: AnimalStack) -> Self {
        stack.label()
    }
}

impl TryFrom<String> for AnimalStack {
    type Error = OpError;

    fn try_from(s: String) -> Result<Self> {
        AnimalStack::parse(&s)
    }
}
