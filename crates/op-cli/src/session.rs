//! Edit operations for `op edit`, parsed from `kind[:arg]` tokens.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, bail};
use op_core::{AnimalGrantPosition, CellId, CoinEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
    Letter(usize),
    Charge(usize),
    Axis,
    Reset,
    Animal(AnimalGrantPosition),
}

impl FromStr for EditOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };
        let order = |arg: Option<&str>| -> anyhow::Result<usize> {
            let raw = arg.with_context(|| format!("'{kind}' needs a grant order, e.g. {kind}:0"))?;
            raw.parse()
                .with_context(|| format!("'{raw}' is not a grant order"))
        };
        match (kind.to_ascii_lowercase().as_str(), arg) {
            ("letter", _) => Ok(EditOp::Letter(order(arg)?)),
            ("charge", _) => Ok(EditOp::Charge(order(arg)?)),
            ("axis", None) => Ok(EditOp::Axis),
            ("reset", None) => Ok(EditOp::Reset),
            ("animal", Some(position)) => Ok(EditOp::Animal(AnimalGrantPosition::from_label(
                position,
            )?)),
            _ => bail!("unknown edit '{s}' (expected letter:N, charge:N, axis, reset or animal:POS)"),
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Letter(order) => write!(f, "letter:{order}"),
            EditOp::Charge(order) => write!(f, "charge:{order}"),
            EditOp::Axis => f.write_str("axis"),
            EditOp::Reset => f.write_str("reset"),
            EditOp::Animal(position) => write!(f, "animal:{position}"),
        }
    }
}

impl EditOp {
    pub fn apply(self, engine: &mut CoinEngine) -> op_core::Result<Vec<CellId>> {
        match self {
            EditOp::Letter(order) => engine.switch_letter(order),
            EditOp::Charge(order) => engine.switch_charge(order),
            EditOp::Axis => engine.switch_main_axis(),
            EditOp::Reset => engine.reset_animals(),
            EditOp::Animal(position) => engine.set_animal_order(position),
        }
    }
}
