//! Anvil - type layer of the Anvil compiler front end
//!
//! # Overview
//!
//! This crate is the public face of the type layer. It re-exports
//! [`anvil_types`], which turns parsed type syntax into canonical,
//! pointer-comparable types and binds generic nominal types to concrete
//! arguments.
//!
//! # Quick Start
//!
//! ```
//! use anvil::{Bump, DataDecl, NoBackend, Primitive, TypeArena, TypeSyntax};
//!
//! // All types of one compilation live in a caller-owned arena.
//! let bump = Bump::new();
//! let arena = TypeArena::new(&bump);
//!
//! // Declare `Pair[a, b] = (a, b)`.
//! let a = arena.type_var("a");
//! let b = arena.type_var("b");
//! arena.define("Pair", DataDecl::new().generics([a, b]).members([a, b]));
//!
//! // Lower `Pair[i32, bool]` from syntax.
//! let syntax = TypeSyntax::data(
//!     "Pair",
//!     [
//!         TypeSyntax::primitive(Primitive::I32),
//!         TypeSyntax::primitive(Primitive::Bool),
//!     ],
//! );
//! let ty = arena.lower(&syntax, &mut NoBackend).unwrap();
//!
//! assert_eq!(ty.to_string(), "Pair<i32,bool>");
//! assert!(!ty.is_generic());
//! assert_eq!(ty, arena.lower(&syntax, &mut NoBackend).unwrap());
//! ```
//!
//! # Code Generation
//!
//! Every newly bound variant is reported once to a [`VariantHook`]. The
//! hook may return a [`BackendRepr`], which is stored on the variant and
//! never interpreted by the type layer. Closures work as hooks:
//!
//! ```
//! use anvil::{BackendRepr, Bump, Primitive, Ty, TypeArena, TypeSyntax};
//!
//! let bump = Bump::new();
//! let arena = TypeArena::new(&bump);
//! let t = arena.type_var("t");
//! arena.complete("Box", &[arena.pointer(t)], false, &[t]);
//!
//! let mut next_id = 0;
//! let mut hook = |_variant: Ty<'_>, _is_generic: bool| {
//!     next_id += 1;
//!     Some(BackendRepr(next_id))
//! };
//!
//! let syntax = TypeSyntax::data("Box", [TypeSyntax::primitive(Primitive::U8)]);
//! let ty = arena.lower(&syntax, &mut hook).unwrap();
//! assert_eq!(ty.as_data().unwrap().backend(), Some(BackendRepr(1)));
//! ```

pub use anvil_types::*;

/// Arena allocator that owns every type node.
pub use bumpalo::Bump;
