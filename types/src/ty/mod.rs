//! Type handles and their underlying nodes.
//!
//! - [`Ty`] and [`TyNode`]: canonical handles and the interned nodes
//! - [`TyKind`]: the eight type shapes
//! - [`TyFlags`]: cached type properties for efficient queries
//! - [`TyHasher`]: structural hash combiner used by the intern tables

mod flags;
mod handle;
mod hash;
mod kind;

pub use flags::TyFlags;
pub use handle::{Binding, Ident, Ty, TyNode};
pub use hash::{TyBuildHasher, TyHasher};
pub use kind::{AggregateKind, DirectiveId, Modifier, Primitive, Qualifier, TyKind, TypeTag};
