//! Canonical type representation for the Anvil front end.
//!
//! Every type lives in a [`TypeArena`] and is handed out as a [`Ty`], a
//! pointer-sized handle. Structurally equal types are interned to the same
//! node, so comparing two handles is comparing two types.
//!
//! Nominal types (structs and tagged unions) are interned by name and can
//! be bound to concrete type arguments, which produces one canonical
//! variant per distinct binding set.
//!
//! # Example
//!
//! ```
//! use anvil_types::{Binding, DataDecl, NoBackend, TypeArena};
//! use bumpalo::Bump;
//!
//! let bump = Bump::new();
//! let arena = TypeArena::new(&bump);
//!
//! let a = arena.type_var("a");
//! let b = arena.type_var("b");
//! let pair = arena.define("Pair", DataDecl::new().generics([a, b]).members([a, b]));
//!
//! let bindings = [
//!     Binding::new(arena.ident("a"), arena.i32()),
//!     Binding::new(arena.ident("b"), arena.bool()),
//! ];
//! let bound = arena.get_variant(pair, &bindings, &mut NoBackend).unwrap();
//!
//! assert_eq!(bound.as_data().unwrap().members(), &[arena.i32(), arena.bool()]);
//! assert!(!bound.is_generic());
//! assert_eq!(bound, arena.get_variant(pair, &bindings, &mut NoBackend).unwrap());
//! ```

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

mod algo;
mod arena;
mod binding;
mod data;
mod display;
mod error;
mod lower;
mod macros;
mod modifier;
mod syntax;
pub mod traversal;
mod ty;

pub use arena::{ArenaStats, TypeArena};
pub use binding::{NoBackend, VariantHook};
pub use data::{BackendRepr, DataDecl, DataState, DataType, Tag};
pub use display::{DataDump, bound_name};
pub use error::TypeError;
pub use syntax::{ModifierSyntax, TypeSyntax};
pub use ty::{
    AggregateKind, Binding, DirectiveId, Ident, Modifier, Primitive, Qualifier, Ty, TyBuildHasher,
    TyFlags, TyHasher, TyKind, TyNode, TypeTag,
};
