//! Cells of the coin engine and their public snapshots.

use std::fmt;

use serde::Serialize;

use crate::animal::Animal;
use crate::function::CognitiveFunction;
use crate::position::{AnimalGrantPosition, GrantOrder};

/// Address of one of the eight engine cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "lowercase")]
pub enum CellId {
    Function(GrantOrder),
    Animal(AnimalGrantPosition),
}

impl CellId {
    pub const ALL: [CellId; 8] = [
        CellId::Function(GrantOrder::ALL[0]),
        CellId::Function(GrantOrder::ALL[1]),
        CellId::Function(GrantOrder::ALL[2]),
        CellId::Function(GrantOrder::ALL[3]),
        CellId::Animal(AnimalGrantPosition::StrongerInfo),
        CellId::Animal(AnimalGrantPosition::StrongerEnergy),
        CellId::Animal(AnimalGrantPosition::WeakerInfo),
        CellId::Animal(AnimalGrantPosition::WeakerEnergy),
    ];

    /// Cells whose state is recomputed when this cell changes.
    ///
    /// ```text
    /// fn0 <-> fn3     fn1 <-> fn2     STRONGER_INFO -> fn1, fn2
    /// ```
    pub fn dependents(self) -> &'static [CellId] {
        const FN: [CellId; 4] = [
            CellId::Function(GrantOrder::ALL[0]),
            CellId::Function(GrantOrder::ALL[1]),
            CellId::Function(GrantOrder::ALL[2]),
            CellId::Function(GrantOrder::ALL[3]),
        ];
        match self {
            CellId::Function(order) => match order.index() {
                0 => &FN[3..4],
                1 => &FN[2..3],
                2 => &FN[1..2],
                _ => &FN[0..1],
            },
            CellId::Animal(AnimalGrantPosition::StrongerInfo) => &FN[1..3],
            CellId::Animal(_) => &[],
        }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellId::Function(order) => write!(f, "fn{order}"),
            CellId::Animal(position) => write!(f, "{position}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCoin {
    pub function: CognitiveFunction,
    pub is_demon: bool,
    pub is_masculine: bool,
}

impl FunctionCoin {
    pub fn new(function: CognitiveFunction) -> Self {
        Self {
            function,
            is_demon: false,
            is_masculine: false,
        }
    }
}

/// Stored state of an animal cell. The animal itself is not stored: it is
/// read off the two function cells the position pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalCoin {
    pub order: Option<usize>,
    pub is_double_activated: bool,
}

impl AnimalCoin {
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellState {
    Function(FunctionCoin),
    Animal(AnimalCoin),
}

/// A cell's state plus the generation that last wrote it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Coin<S> {
    pub(crate) state: S,
    generation: u64,
}

impl<S> Coin<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            generation: 0,
        }
    }

    pub(crate) fn stamp(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub(crate) fn is_stamped(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// What the external channel hands to rendering consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CellSnapshot {
    #[serde(rename_all = "camelCase")]
    Function {
        order: GrantOrder,
        label: CognitiveFunction,
        is_demon: bool,
        is_masculine: bool,
    },
    #[serde(rename_all = "camelCase")]
    Animal {
        position: AnimalGrantPosition,
        animal: Option<Animal>,
        order: Option<usize>,
        is_double_activated: bool,
    },
}

impl CellSnapshot {
    pub fn id(&self) -> CellId {
        match self {
            CellSnapshot::Function { order, .. } => CellId::Function(*order),
            CellSnapshot::Animal { position, .. } => CellId::Animal(*position),
        }
    }
}
