//! Objective Personality type algebra.
//!
//! Three layers, all pure logic with no I/O:
//!
//! - the domain algebra: axes, charges, letters, human needs, cognitive
//!   functions, animals and grant positions, with their opposites and merges;
//! - derivation of a complete [`OpType`] from a partial [`OpTypeSeed`];
//! - the [`CoinEngine`], eight interdependent cells kept consistent as the
//!   user flips individual choices.

pub mod animal;
pub mod axis;
pub mod charge;
pub mod coin;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod function;
pub mod letter;
pub mod modality;
pub mod need;
pub mod optype;
pub mod position;
pub mod quadra;
pub mod scope;
pub mod serde_compat;
pub mod social;

pub use animal::{Animal, AnimalStack};
pub use axis::Axis;
pub use charge::Charge;
pub use coin::{AnimalCoin, CellId, CellSnapshot, FunctionCoin};
pub use conflict::Conflict;
pub use engine::{CoinEngine, Listener, SubscriptionId};
pub use error::{OpError, Result};
pub use function::{CognitiveFunction, Component};
pub use letter::Letter;
pub use modality::{Modality, Sex};
pub use need::HumanNeed;
pub use optype::{OpType, OpTypeSeed};
pub use position::{AnimalGrantPosition, GrantOrder};
pub use quadra::Quadra;
pub use scope::RealityScope;
pub use serde_compat::{CURRENT_VERSION, export_json, import_json, is_compatible_version};
pub use social::SocialType;
