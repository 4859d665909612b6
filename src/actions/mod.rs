//! Action definitions and the catalog they are loaded into.

pub mod catalog;
pub mod formulas;
pub mod types;

pub use catalog::{ActionCatalog, ActionSpec, CatalogError, LoopSpec};
pub use formulas::{
    HistoryScaling, LoopCost, LoopMax, LoopTick, ManaCost, Quantity, ResourceOp, Scope,
};
pub use types::{ActionDef, ActionKind, LoopDescriptor, LoopEffects};
