use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::charge::Charge;
use crate::error::{OpError, Result};
use crate::function::CognitiveFunction;
use crate::letter::Letter;

/// A group of four functions fixed by its introverted decider and introverted
/// observer. The extroverted members are their opposites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadra {
    Alpha,
    Beta,
    Gamma,
    Delta,
}

impl Quadra {
    pub const ALL: [Quadra; 4] = [Quadra::Alpha, Quadra::Beta, Quadra::Gamma, Quadra::Delta];

    fn introverted_letters(self) -> (Letter, Letter) {
        match self {
            Quadra::Alpha => (Letter::Thinking, Letter::Sensing),
            Quadra::Beta => (Letter::Thinking, Letter::Intuiting),
            Quadra::Gamma => (Letter::Feeling, Letter::Intuiting),
            Quadra::Delta => (Letter::Feeling, Letter::Sensing),
        }
    }

    /// Resolve from the introverted decider and introverted observer.
    pub fn from_introverted(decider: &CognitiveFunction, observer: &CognitiveFunction) -> Result<Self> {
        let key = match (decider.letter(), decider.charge(), observer.letter(), observer.charge()) {
            (Some(d), Some(Charge::Introverted), Some(o), Some(Charge::Introverted))
                if d.axis() == Axis::Deciding && o.axis() == Axis::Observing =>
            {
                (d, o)
            }
            _ => {
                return Err(OpError::validation(
                    "quadra members",
                    format!("{decider}+{observer}"),
                ));
            }
        };
        Quadra::ALL
            .into_iter()
            .find(|q| q.introverted_letters() == key)
            .ok_or_else(|| OpError::validation("quadra members", format!("{decider}+{observer}")))
    }

    /// Resolve from any set of fully known functions that includes an
    /// introverted decider and an introverted observer.
    pub fn from_members<'a>(functions: impl IntoIterator<Item = &'a CognitiveFunction>) -> Result<Self> {
        let mut decider = None;
        let mut observer = None;
        for f in functions {
            if f.charge() != Some(Charge::Introverted) || f.letter().is_none() {
                continue;
            }
            let slot = match f.axis() {
                Axis::Deciding => &mut decider,
                Axis::Observing => &mut observer,
            };
            if let Some(existing) = *slot
                && existing != *f
            {
                return Err(OpError::conflict("quadra member", existing, f));
            }
            *slot = Some(*f);
        }
        match (decider, observer) {
            (Some(d), Some(o)) => Quadra::from_introverted(&d, &o),
            _ => Err(OpError::validation("quadra members", "missing introverted member")),
        }
    }

    pub fn di(self) -> CognitiveFunction {
        CognitiveFunction::new(self.introverted_letters().0, Charge::Introverted)
    }

    pub fn de(self) -> CognitiveFunction {
        self.di().opposite()
    }

    pub fn oi(self) -> CognitiveFunction {
        CognitiveFunction::new(self.introverted_letters().1, Charge::Introverted)
    }

    pub fn oe(self) -> CognitiveFunction {
        self.oi().opposite()
    }

    pub fn sensing(self) -> CognitiveFunction {
        self.member(Letter::Sensing)
    }

    pub fn intuition(self) -> CognitiveFunction {
        self.member(Letter::Intuiting)
    }

    pub fn feeling(self) -> CognitiveFunction {
        self.member(Letter::Feeling)
    }

    pub fn thinking(self) -> CognitiveFunction {
        self.member(Letter::Thinking)
    }

    fn member(self, letter: Letter) -> CognitiveFunction {
        let (d, o) = self.introverted_letters();
        if letter == d || letter == o {
            CognitiveFunction::new(letter, Charge::Introverted)
        } else {
            CognitiveFunction::new(letter, Charge::Extroverted)
        }
    }

    pub fn functions(self) -> [CognitiveFunction; 4] {
        [self.di(), self.de(), self.oi(), self.oe()]
    }

    pub fn contains(self, function: &CognitiveFunction) -> bool {
        self.functions().contains(function)
    }

    pub fn name(self) -> &'static str {
        match self {
            Quadra::Alpha => "alpha",
            Quadra::Beta => "beta",
            Quadra::Gamma => "gamma",
            Quadra::Delta => "delta",
        }
    }

    pub fn from_label(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Quadra::ALL
            .into_iter()
            .find(|q| q.name() == lower)
            .ok_or_else(|| OpError::validation("quadra", s))
    }
}

impl fmt::Display for Quadra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(label: &str) -> CognitiveFunction {
        CognitiveFunction::from_label(label).unwrap()
    }

    #[test]
    fn test_members() {
        let labels: Vec<String> = Quadra::Gamma.functions().iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["Fi", "Te", "Ni", "Se"]);
        assert_eq!(Quadra::Alpha.sensing(), f("Si"));
        assert_eq!(Quadra::Alpha.intuition(), f("Ne"));
        assert_eq!(Quadra::Beta.feeling(), f("Fe"));
        assert_eq!(Quadra::Delta.thinking(), f("Te"));
    }

    #[test]
    fn test_every_function_in_two_quadras() {
        for letter in Letter::ALL {
            for charge in Charge::ALL {
                let func = CognitiveFunction::new(letter, charge);
                let count = Quadra::ALL.iter().filter(|q| q.contains(&func)).count();
                assert_eq!(count, 2, "{func}");
            }
        }
    }

    #[test]
    fn test_from_introverted() {
        assert_eq!(Quadra::from_introverted(&f("Fi"), &f("Ni")).unwrap(), Quadra::Gamma);
        assert_eq!(Quadra::from_introverted(&f("Ti"), &f("Si")).unwrap(), Quadra::Alpha);
        assert!(Quadra::from_introverted(&f("Fe"), &f("Ni")).is_err());
        assert!(Quadra::from_introverted(&f("Ni"), &f("Fi")).is_err());
    }

    #[test]
    fn test_from_members() {
        let seed = [f("Fi"), f("Se"), f("Te"), f("Ni")];
        assert_eq!(Quadra::from_members(&seed).unwrap(), Quadra::Gamma);
        assert!(Quadra::from_members(&[f("Fe"), f("Se")]).is_err());
        assert!(Quadra::from_members(&[f("Fi"), f("Ti"), f("Si")]).is_err());
    }

    #[test]
    fn test_label_case_insensitive() {
        assert_eq!(Quadra::from_label("GAMMA").unwrap(), Quadra::Gamma);
        assert_eq!(Quadra::from_label("Beta").unwrap(), Quadra::Beta);
        assert!(Quadra::from_label("epsilon").is_err());
    }
}
