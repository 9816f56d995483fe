//! The coin engine: eight interdependent cells edited through generations.
//!
//! Every user edit opens a new generation. The edited cell is written and
//! stamped, then its change travels the internal wiring breadth-first. A cell
//! may change at most once per generation: an update that would alter an
//! already-stamped cell aborts the edit with `InvalidOperation`, while an
//! update that leaves the cell as it is (the echo of a mutual pair) is
//! dropped. A failed edit restores every cell to its state before the edit.
//!
//! External listeners run only after the whole edit has settled, once per
//! changed cell. They receive snapshots, never the engine, so they cannot
//! start a nested edit.

use std::collections::VecDeque;
use std::fmt;

use crate::animal::Animal;
use crate::axis::Axis;
use crate::charge::Charge;
use crate::coin::{AnimalCoin, CellId, CellSnapshot, CellState, Coin, FunctionCoin};
use crate::error::{OpError, Result};
use crate::function::CognitiveFunction;
use crate::optype::OpType;
use crate::position::{AnimalGrantPosition, GrantOrder};
use crate::scope::RealityScope;

pub type Listener = Box<dyn FnMut(&CellSnapshot)>;

/// Handle returned by [`CoinEngine::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    cell: Option<CellId>,
    listener: Listener,
}

pub struct CoinEngine {
    functions: [Coin<FunctionCoin>; 4],
    animals: [Coin<AnimalCoin>; 4],
    generation: u64,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl Default for CoinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CoinEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinEngine")
            .field("functions", &self.functions.map(|c| c.state))
            .field("animals", &self.animals.map(|c| c.state))
            .field("generation", &self.generation)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl CoinEngine {
    /// An engine with nothing known beyond the main axis.
    pub fn new() -> Self {
        Self::from_seed(CognitiveFunction::unknown(Axis::Deciding))
    }

    /// Fill the function cells with the grant template of `seed`.
    pub fn from_seed(seed: CognitiveFunction) -> Self {
        let functions = GrantOrder::ALL.map(|order| {
            let mut coin = FunctionCoin::new(seed.grant_match(order));
            coin.is_demon = order.index() == 3;
            Coin::new(coin)
        });
        Self {
            functions,
            animals: [Coin::new(AnimalCoin::default()); 4],
            generation: 0,
            subscriptions: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Load a derived type: functions, masculine flags, stack orders and the
    /// double-activated cell.
    pub fn from_op_type(op_type: &OpType) -> Self {
        let stack = op_type.grant_stack();
        let animals = AnimalGrantPosition::ALL.map(|position| {
            let coin = match position.animal_in(stack) {
                Ok(animal) => AnimalCoin {
                    order: Some(op_type.animal_stack().position_of(animal)),
                    is_double_activated: animal == op_type.double_activated_animal(),
                },
                Err(_) => AnimalCoin::default(),
            };
            Coin::new(coin)
        });
        let stronger_info = animals[AnimalGrantPosition::StrongerInfo.index()].state;
        let functions = GrantOrder::ALL.map(|order| {
            let function = stack[order.index()];
            Coin::new(FunctionCoin {
                function,
                is_demon: match order.index() {
                    1 => stronger_info_demon(stronger_info.order, &stack[0], &function),
                    3 => true,
                    _ => false,
                },
                is_masculine: op_type.is_masculine(&function),
            })
        });
        Self {
            functions,
            animals,
            generation: 0,
            subscriptions: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn function_cell(&self, order: GrantOrder) -> FunctionCoin {
        self.functions[order.index()].state
    }

    pub fn animal_cell(&self, position: AnimalGrantPosition) -> AnimalCoin {
        self.animals[position.index()].state
    }

    pub fn functions(&self) -> [CognitiveFunction; 4] {
        self.functions.map(|c| c.state.function)
    }

    /// The animal the two function cells of `position` form, if both charges
    /// are known and the cells sit on different axes.
    pub fn animal_at(&self, position: AnimalGrantPosition) -> Option<Animal> {
        position.animal_in(&self.functions()).ok()
    }

    pub fn snapshot(&self, cell: CellId) -> CellSnapshot {
        match cell {
            CellId::Function(order) => {
                let coin = self.function_cell(order);
                CellSnapshot::Function {
                    order,
                    label: coin.function,
                    is_demon: coin.is_demon,
                    is_masculine: coin.is_masculine,
                }
            }
            CellId::Animal(position) => {
                let coin = self.animal_cell(position);
                CellSnapshot::Animal {
                    position,
                    animal: self.animal_at(position),
                    order: coin.order,
                    is_double_activated: coin.is_double_activated,
                }
            }
        }
    }

    pub fn snapshots(&self) -> Vec<CellSnapshot> {
        CellId::ALL.iter().map(|c| self.snapshot(*c)).collect()
    }

    /// Call `listener` after every edit that changes `cell`.
    pub fn subscribe(
        &mut self,
        cell: CellId,
        listener: impl FnMut(&CellSnapshot) + 'static,
    ) -> SubscriptionId {
        self.add_subscription(Some(cell), Box::new(listener))
    }

    /// Call `listener` once for every cell an edit changes.
    pub fn subscribe_all(&mut self, listener: impl FnMut(&CellSnapshot) + 'static) -> SubscriptionId {
        self.add_subscription(None, Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    fn add_subscription(&mut self, cell: Option<CellId>, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription { id, cell, listener });
        id
    }

    // --- edits ---

    /// Flip the letter of a function cell. A cell without a letter takes the
    /// concrete letter of its axis.
    pub fn switch_letter(&mut self, order: usize) -> Result<Vec<CellId>> {
        let order = GrantOrder::try_from(order)?;
        self.transaction("switch_letter", |engine, touched| {
            let mut coin = engine.function_cell(order);
            coin.function = match coin.function.letter() {
                Some(_) => coin.function.with_opposite_letter(),
                None => coin
                    .function
                    .with_letter(RealityScope::Concrete.letter(coin.function.axis()), false)?,
            };
            engine.domino(touched, &[(CellId::Function(order), CellState::Function(coin))])
        })
    }

    /// Flip the charge of a savior-or-demon cell. The middle orders take
    /// their charge from the savior pair and cannot be switched directly.
    pub fn switch_charge(&mut self, order: usize) -> Result<Vec<CellId>> {
        if order == 1 || order == 2 {
            return Err(OpError::InvalidOperation(format!(
                "charge of grant order {order} follows the savior pair"
            )));
        }
        let order = GrantOrder::try_from(order)?;
        self.transaction("switch_charge", |engine, touched| {
            let mut coin = engine.function_cell(order);
            coin.function = match coin.function.charge() {
                Some(_) => coin.function.with_opposite_charge(),
                None => coin.function.with_charge(Charge::Introverted),
            };
            engine.domino(touched, &[(CellId::Function(order), CellState::Function(coin))])
        })
    }

    /// Exchange the two savior cells, and with them the main axis. Runs as
    /// consecutive generations inside one edit; listeners see the end state.
    pub fn switch_main_axis(&mut self) -> Result<Vec<CellId>> {
        self.transaction("switch_main_axis", |engine, touched| {
            let [first, second, third, fourth] = engine.functions.map(|c| c.state);

            let mut cell = first;
            cell.function = second.function;
            cell.is_masculine = second.is_masculine;
            engine.domino(touched, &[(function_id(0), CellState::Function(cell))])?;

            let mut cell = second;
            cell.function = first.function;
            cell.is_masculine = first.is_masculine;
            engine.domino(touched, &[(function_id(1), CellState::Function(cell))])?;

            let mut weak = engine.function_cell(GrantOrder::ALL[2]);
            weak.is_masculine = fourth.is_masculine;
            let mut demon = engine.function_cell(GrantOrder::ALL[3]);
            demon.is_masculine = third.is_masculine;
            engine.domino(
                touched,
                &[
                    (function_id(2), CellState::Function(weak)),
                    (function_id(3), CellState::Function(demon)),
                ],
            )
        })
    }

    /// Clear every stack order and the double-activated mark.
    pub fn reset_animals(&mut self) -> Result<Vec<CellId>> {
        self.transaction("reset_animals", |engine, touched| {
            let edits: Vec<_> = AnimalGrantPosition::ALL
                .iter()
                .map(|p| (CellId::Animal(*p), CellState::Animal(AnimalCoin::default())))
                .collect();
            engine.domino(touched, &edits)
        })
    }

    /// Give `position` the next free stack order. When this leaves one cell
    /// unordered, that cell takes the last order and the cell opposite it is
    /// marked double-activated.
    pub fn set_animal_order(&mut self, position: AnimalGrantPosition) -> Result<Vec<CellId>> {
        if let Some(order) = self.animal_cell(position).order {
            return Err(OpError::InvalidOperation(format!(
                "{position} already holds stack order {order}"
            )));
        }
        self.transaction("set_animal_order", |engine, touched| {
            let current = engine.animals.map(|c| c.state);
            let assigned = current.iter().filter(|c| c.is_ordered()).count();

            let mut next = current;
            next[position.index()].order = Some(assigned);
            if assigned == 2
                && let Some(last) = AnimalGrantPosition::ALL
                    .into_iter()
                    .find(|p| !next[p.index()].is_ordered())
            {
                next[last.index()].order = Some(3);
                for p in AnimalGrantPosition::ALL {
                    next[p.index()].is_double_activated = p == last.opposite();
                }
            }

            let edits: Vec<_> = AnimalGrantPosition::ALL
                .iter()
                .filter(|p| next[p.index()] != current[p.index()])
                .map(|p| (CellId::Animal(*p), CellState::Animal(next[p.index()])))
                .collect();
            engine.domino(touched, &edits)
        })
    }

    // --- propagation ---

    /// Run `edit` with rollback and deferred notification.
    fn transaction(
        &mut self,
        op: &'static str,
        edit: impl FnOnce(&mut Self, &mut Vec<CellId>) -> Result<()>,
    ) -> Result<Vec<CellId>> {
        let functions = self.functions;
        let animals = self.animals;
        let animals_before = AnimalGrantPosition::ALL.map(|p| self.animal_at(p));
        let mut touched = Vec::new();

        if let Err(e) = edit(self, &mut touched) {
            self.functions = functions;
            self.animals = animals;
            tracing::warn!("{op} rolled back at generation {}: {e}", self.generation);
            return Err(e);
        }

        // Animal labels are read off the function cells, so they change
        // without being written.
        for position in AnimalGrantPosition::ALL {
            let cell = CellId::Animal(position);
            if self.animal_at(position) != animals_before[position.index()]
                && !touched.contains(&cell)
            {
                touched.push(cell);
            }
        }

        tracing::debug!(
            "{op} settled at generation {} ({} cells changed)",
            self.generation,
            touched.len()
        );
        self.notify(&touched);
        Ok(touched)
    }

    /// Open a generation, apply `edits` and propagate each through the wiring.
    fn domino(&mut self, touched: &mut Vec<CellId>, edits: &[(CellId, CellState)]) -> Result<()> {
        self.generation += 1;
        let generation = self.generation;
        let mut cascade = Cascade::new(self, generation, touched);
        for (cell, state) in edits {
            cascade.edit(*cell, *state)?;
        }
        Ok(())
    }

    fn state(&self, cell: CellId) -> CellState {
        match cell {
            CellId::Function(order) => CellState::Function(self.function_cell(order)),
            CellId::Animal(position) => CellState::Animal(self.animal_cell(position)),
        }
    }

    fn is_stamped(&self, cell: CellId, generation: u64) -> bool {
        match cell {
            CellId::Function(order) => self.functions[order.index()].is_stamped(generation),
            CellId::Animal(position) => self.animals[position.index()].is_stamped(generation),
        }
    }

    fn write(&mut self, cell: CellId, state: CellState, generation: u64) -> Result<()> {
        match (cell, state) {
            (CellId::Function(order), CellState::Function(coin)) => {
                let slot = &mut self.functions[order.index()];
                slot.state = coin;
                slot.stamp(generation);
            }
            (CellId::Animal(position), CellState::Animal(coin)) => {
                let slot = &mut self.animals[position.index()];
                slot.state = coin;
                slot.stamp(generation);
            }
            _ => {
                return Err(OpError::InvalidOperation(format!(
                    "{cell} cannot hold {state:?}"
                )));
            }
        }
        Ok(())
    }

    /// What `target` becomes after `source` changed, or `None` when it stays
    /// as it is.
    fn react(&self, target: CellId, source: CellId) -> Option<CellState> {
        let CellId::Function(order) = target else {
            return None;
        };
        let current = self.function_cell(order);
        let mut next = current;
        match source {
            CellId::Function(partner) => {
                next.function = self.function_cell(partner).function.opposite();
                if order.index() == 3 {
                    next.is_demon = true;
                }
            }
            CellId::Animal(AnimalGrantPosition::StrongerInfo) => {}
            CellId::Animal(_) => return None,
        }
        match self.settle(target, CellState::Function(next)) {
            settled if settled == CellState::Function(current) => None,
            settled => Some(settled),
        }
    }

    /// Fill in the parts of a cell's state that follow from other cells.
    /// Cell 1 is a demon while the stronger-info animal is formed and leads
    /// the stack; the rule is applied whenever cell 1 is written.
    fn settle(&self, cell: CellId, state: CellState) -> CellState {
        match (cell, state) {
            (CellId::Function(order), CellState::Function(mut coin)) if order.index() == 1 => {
                let fn0 = self.function_cell(GrantOrder::ALL[0]).function;
                let order = self.animal_cell(AnimalGrantPosition::StrongerInfo).order;
                coin.is_demon = stronger_info_demon(order, &fn0, &coin.function);
                CellState::Function(coin)
            }
            _ => state,
        }
    }

    fn notify(&mut self, touched: &[CellId]) {
        if self.subscriptions.is_empty() {
            return;
        }
        let snapshots: Vec<CellSnapshot> = touched.iter().map(|c| self.snapshot(*c)).collect();
        for snapshot in &snapshots {
            for sub in &mut self.subscriptions {
                if sub.cell.is_none_or(|c| c == snapshot.id()) {
                    (sub.listener)(snapshot);
                }
            }
        }
    }
}

fn function_id(i: usize) -> CellId {
    CellId::Function(GrantOrder::ALL[i])
}

fn stronger_info_demon(
    order: Option<usize>,
    fn0: &CognitiveFunction,
    fn1: &CognitiveFunction,
) -> bool {
    order == Some(0) && Animal::from_functions(fn0, fn1).is_ok()
}

/// One generation in flight.
struct Cascade<'a> {
    engine: &'a mut CoinEngine,
    generation: u64,
    touched: &'a mut Vec<CellId>,
    /// Last stronger-info animal seen; a change re-emits that cell.
    stronger_info: Option<Animal>,
}

impl<'a> Cascade<'a> {
    fn new(engine: &'a mut CoinEngine, generation: u64, touched: &'a mut Vec<CellId>) -> Self {
        let stronger_info = engine.animal_at(AnimalGrantPosition::StrongerInfo);
        Self {
            engine,
            generation,
            touched,
            stronger_info,
        }
    }

    fn edit(&mut self, cell: CellId, state: CellState) -> Result<()> {
        let state = self.engine.settle(cell, state);
        if self.engine.state(cell) == state {
            return Ok(());
        }
        self.apply(cell, state)?;
        self.emit(cell)
    }

    fn apply(&mut self, cell: CellId, state: CellState) -> Result<()> {
        if self.engine.is_stamped(cell, self.generation) {
            return Err(OpError::InvalidOperation(format!(
                "{cell} changed twice in generation {}",
                self.generation
            )));
        }
        self.engine.write(cell, state, self.generation)?;
        if !self.touched.contains(&cell) {
            self.touched.push(cell);
        }
        Ok(())
    }

    fn emit(&mut self, source: CellId) -> Result<()> {
        let mut queue = VecDeque::from([source]);
        while let Some(source) = queue.pop_front() {
            for &target in source.dependents() {
                let Some(update) = self.engine.react(target, source) else {
                    continue;
                };
                tracing::trace!("generation {}: {source} -> {target}", self.generation);
                self.apply(target, update)?;
                queue.push_back(target);
            }
            if self.moved_stronger_info(source) {
                queue.push_back(CellId::Animal(AnimalGrantPosition::StrongerInfo));
            }
        }
        Ok(())
    }

    /// Whether `source` changed the animal the stronger-info cell reads off
    /// cells 0 and 1. That cell is never written for it, only re-emitted.
    fn moved_stronger_info(&mut self, source: CellId) -> bool {
        let CellId::Function(order) = source else {
            return false;
        };
        if order.index() > 1 {
            return false;
        }
        let animal = self.engine.animal_at(AnimalGrantPosition::StrongerInfo);
        if animal == self.stronger_info {
            return false;
        }
        self.stronger_info = animal;
        true
    }
}
