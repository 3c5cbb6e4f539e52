//! Nominal data types: structs, tagged unions, and their bound variants.
//!
//! A declaration moves through three states. A stub is created by the
//! first reference to a name. Completing it fills in members and generic
//! parameters in place, so handles taken from the stub stay valid. Binding
//! a complete generic declaration produces variants, which are separate
//! nodes recorded on the root declaration.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, OnceCell, RefCell};
use core::fmt;

use allocator_api2::vec::Vec as BumpVec;
use bumpalo::Bump;

use crate::arena::TypeArena;
use crate::error::TypeError;
use crate::ty::{Binding, Ident, Ty, TyFlags, TyKind};

/// Lifecycle state of a nominal declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataState {
    /// Declared by name, not yet defined.
    Stub,
    /// Defined; may be generic.
    Complete,
    /// Bound copy of a complete generic declaration.
    Variant,
}

/// A tagged-union alternative name and its numeric discriminant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: Ident<'a>,
    pub value: u16,
}

/// Opaque slot filled by the code generator for each bound variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackendRepr(pub u64);

/// Everything about a declaration that completion or binding replaces.
///
/// All lists live in the arena, so copying a `DataDef` shares them.
#[derive(Copy, Clone)]
pub(crate) struct DataDef<'a> {
    pub(crate) state: DataState,
    pub(crate) is_union: bool,
    pub(crate) is_alias: bool,
    pub(crate) members: &'a [Ty<'a>],
    pub(crate) fields: &'a [Ident<'a>],
    pub(crate) tags: &'a [Tag<'a>],
    pub(crate) parent_union: Option<Ty<'a>>,
    pub(crate) generics: &'a [Ty<'a>],
    pub(crate) bound_generics: &'a [Binding<'a>],
    pub(crate) unbound: Option<Ty<'a>>,
    pub(crate) trait_impls: &'a [Ident<'a>],
}

impl<'a> DataDef<'a> {
    pub(crate) const STUB: DataDef<'a> = DataDef {
        state: DataState::Stub,
        is_union: false,
        is_alias: false,
        members: &[],
        fields: &[],
        tags: &[],
        parent_union: None,
        generics: &[],
        bound_generics: &[],
        unbound: None,
        trait_impls: &[],
    };
}

/// A user-declared struct or tagged union, stored inline in its type node.
pub struct DataType<'a> {
    name: Ident<'a>,
    flags: Cell<TyFlags>,
    matched: Cell<u32>,
    def: Cell<DataDef<'a>>,
    variants: RefCell<BumpVec<Ty<'a>, &'a Bump>>,
    backend: OnceCell<BackendRepr>,
}

impl<'a> DataType<'a> {
    pub(crate) fn new(bump: &'a Bump, name: Ident<'a>, def: DataDef<'a>) -> Self {
        Self {
            name,
            flags: Cell::new(TyFlags::empty()),
            matched: Cell::new(1),
            def: Cell::new(def),
            variants: RefCell::new(BumpVec::new_in(bump)),
            backend: OnceCell::new(),
        }
    }

    pub fn name(&self) -> Ident<'a> {
        self.name
    }

    pub fn state(&self) -> DataState {
        self.def.get().state
    }

    pub fn is_stub(&self) -> bool {
        self.state() == DataState::Stub
    }

    pub fn is_variant(&self) -> bool {
        self.state() == DataState::Variant
    }

    pub fn is_union(&self) -> bool {
        self.def.get().is_union
    }

    /// True for one alternative of a tagged union.
    pub fn is_union_tag(&self) -> bool {
        self.def.get().parent_union.is_some()
    }

    pub fn is_alias(&self) -> bool {
        self.def.get().is_alias
    }

    pub fn members(&self) -> &'a [Ty<'a>] {
        self.def.get().members
    }

    pub fn fields(&self) -> &'a [Ident<'a>] {
        self.def.get().fields
    }

    pub fn tags(&self) -> &'a [Tag<'a>] {
        self.def.get().tags
    }

    /// Generic parameters still open on this type, as type variables.
    pub fn generics(&self) -> &'a [Ty<'a>] {
        self.def.get().generics
    }

    /// How this variant was bound; empty for a declaration.
    pub fn bound_generics(&self) -> &'a [Binding<'a>] {
        self.def.get().bound_generics
    }

    /// The root declaration this variant was bound from.
    pub fn unbound_type(&self) -> Option<Ty<'a>> {
        self.def.get().unbound
    }

    pub fn parent_union(&self) -> Option<Ty<'a>> {
        self.def.get().parent_union
    }

    pub fn trait_impls(&self) -> &'a [Ident<'a>] {
        self.def.get().trait_impls
    }

    /// Bound variants created from this declaration, oldest first.
    pub fn variants(&self) -> Vec<Ty<'a>> {
        self.variants.borrow().iter().copied().collect()
    }

    pub fn backend(&self) -> Option<BackendRepr> {
        self.backend.get().copied()
    }

    pub fn flags(&self) -> TyFlags {
        self.flags.get()
    }

    pub fn matched_tys(&self) -> u32 {
        self.matched.get()
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.as_str() == field)
    }

    pub fn is_variant_of(&self, declaration: Ty<'a>) -> bool {
        let mut unbound = self.unbound_type();
        while let Some(ty) = unbound {
            if ty == declaration {
                return true;
            }
            unbound = ty.as_data().and_then(|dt| dt.unbound_type());
        }
        false
    }

    /// Discriminant of the union alternative `tag`.
    ///
    /// An alternative reads its enclosing union's table.
    pub fn tag_value(&self, tag: &str) -> Result<u16, TypeError> {
        let found = self
            .tags()
            .iter()
            .chain(
                self.parent_union()
                    .and_then(|u| u.as_data())
                    .map(|u| u.tags())
                    .unwrap_or(&[]),
            )
            .find(|t| t.name.as_str() == tag);

        match found {
            Some(t) => Ok(t.value),
            None => {
                tracing::warn!(ty = %self.name, tag, "no value found for union tag");
                Err(TypeError::UnknownTag {
                    ty: String::from(self.name.as_str()),
                    tag: String::from(tag),
                })
            }
        }
    }

    /// The type an alias declaration stands for: its single member, or the
    /// tuple of its members. Non-aliases yield `void`.
    pub fn aliased_type(&self, arena: &TypeArena<'a>) -> Ty<'a> {
        if !self.is_alias() {
            return arena.void();
        }
        match self.members() {
            [single] => *single,
            members => arena.tuple(members),
        }
    }

    pub(crate) fn def(&self) -> DataDef<'a> {
        self.def.get()
    }

    pub(crate) fn set_def(&self, def: DataDef<'a>) {
        self.def.set(def);
    }

    pub(crate) fn set_flags(&self, flags: TyFlags) {
        self.flags.set(flags);
    }

    pub(crate) fn set_matched(&self, matched: u32) {
        self.matched.set(matched);
    }

    pub(crate) fn push_variant(&self, variant: Ty<'a>) {
        self.variants.borrow_mut().push(variant);
    }

    pub(crate) fn attach_backend(&self, repr: BackendRepr) {
        if self.backend.set(repr).is_err() {
            tracing::debug!(ty = %self.name, "backend representation already attached");
        }
    }
}

impl<'a> fmt::Debug for DataType<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.def.get();
        f.debug_struct("DataType")
            .field("name", &self.name)
            .field("state", &def.state)
            .field("is_union", &def.is_union)
            .field("members", &def.members)
            .field("bound_generics", &def.bound_generics)
            .finish_non_exhaustive()
    }
}

impl<'a> Ty<'a> {
    /// The declaration a variant was bound from, or `self` for anything
    /// that is not a variant.
    pub fn root_declaration(self) -> Ty<'a> {
        match self.as_data().and_then(|dt| dt.unbound_type()) {
            Some(root) => root,
            None => self.strip_modifiers(),
        }
    }
}

/// Builder for the definition of a nominal type.
///
/// # Example
///
/// ```
/// use anvil_types::{DataDecl, TypeArena};
/// use bumpalo::Bump;
///
/// let bump = Bump::new();
/// let arena = TypeArena::new(&bump);
///
/// let t = arena.type_var("t");
/// let list = arena.define(
///     "List",
///     DataDecl::new()
///         .generic(t)
///         .member(arena.pointer(t))
///         .member(arena.usz())
///         .field("items")
///         .field("len"),
/// );
/// assert!(list.is_generic());
/// ```
#[derive(Debug, Default, Clone)]
pub struct DataDecl<'a> {
    members: Vec<Ty<'a>>,
    generics: Vec<Ty<'a>>,
    fields: Vec<String>,
    tags: Vec<(String, u16)>,
    trait_impls: Vec<String>,
    parent_union: Option<Ty<'a>>,
    is_union: bool,
    is_alias: bool,
}

impl<'a> DataDecl<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, ty: Ty<'a>) -> Self {
        self.members.push(ty);
        self
    }

    pub fn members(mut self, tys: impl IntoIterator<Item = Ty<'a>>) -> Self {
        self.members.extend(tys);
        self
    }

    /// Adds a generic parameter. `ty` should be a type variable.
    pub fn generic(mut self, ty: Ty<'a>) -> Self {
        self.generics.push(ty);
        self
    }

    pub fn generics(mut self, tys: impl IntoIterator<Item = Ty<'a>>) -> Self {
        self.generics.extend(tys);
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    pub fn tag(mut self, name: impl Into<String>, value: u16) -> Self {
        self.tags.push((name.into(), value));
        self
    }

    pub fn trait_impl(mut self, name: impl Into<String>) -> Self {
        self.trait_impls.push(name.into());
        self
    }

    /// Marks this declaration as one alternative of `union`.
    pub fn parent_union(mut self, union: Ty<'a>) -> Self {
        self.parent_union = Some(union);
        self
    }

    pub fn union(mut self) -> Self {
        self.is_union = true;
        self
    }

    pub fn alias(mut self) -> Self {
        self.is_alias = true;
        self
    }
}

impl<'a> TypeArena<'a> {
    /// The declaration named `name`, creating a stub on first reference.
    pub fn get_or_declare(&self, name: &str) -> Ty<'a> {
        let name = self.ident(name);
        if let Some(existing) = self.lookup_declared(name) {
            return existing;
        }
        let ty = self.alloc_node(TyKind::Data(DataType::new(
            self.bump(),
            name,
            DataDef::STUB,
        )));
        tracing::debug!(%name, "declared stub");
        self.insert_declared(name, ty);
        ty
    }

    /// The declaration named `name`, if it has been referenced before.
    pub fn declared(&self, name: &str) -> Option<Ty<'a>> {
        self.lookup_declared(self.ident(name))
    }

    /// Gives the declaration `name` its generic parameters ahead of its
    /// members.
    ///
    /// Types that refer back to the declaration, directly or through other
    /// declarations, must be built after this call so they are flagged
    /// generic. The declaration stays a stub until [`TypeArena::define`]
    /// fills in its members; a `define` without generics keeps these.
    ///
    /// ```
    /// use anvil_types::{DataDecl, NoBackend, TypeArena};
    /// use bumpalo::Bump;
    ///
    /// let bump = Bump::new();
    /// let arena = TypeArena::new(&bump);
    ///
    /// // List[t] = (t, List[t]*)
    /// let t = arena.type_var("t");
    /// let list = arena.declare_generic("List", &[t]);
    /// let next = arena.pointer(list);
    /// arena.define("List", DataDecl::new().member(t).member(next));
    ///
    /// let ints = arena.bind_positional(list, &[arena.i32()], &mut NoBackend).unwrap();
    /// assert_eq!(ints.as_data().unwrap().members()[1], arena.pointer(ints));
    /// ```
    pub fn declare_generic(&self, name: &str, generics: &[Ty<'a>]) -> Ty<'a> {
        let ty = self.get_or_declare(name);
        let Some(dt) = ty.as_data() else {
            return ty;
        };
        if !dt.is_stub() {
            tracing::warn!(name, "type is already defined; keeping its generic parameters");
            return ty;
        }

        dt.set_def(DataDef {
            generics: self.alloc_slice(generics),
            ..dt.def()
        });
        dt.set_flags(if generics.is_empty() {
            TyFlags::empty()
        } else {
            TyFlags::HAS_TYPE_VARS
        });
        tracing::debug!(name, count = generics.len(), "declared generic parameters");
        ty
    }

    /// Defines `name` from `members`, completing an existing stub in place.
    pub fn complete(
        &self,
        name: &str,
        members: &[Ty<'a>],
        is_union: bool,
        generics: &[Ty<'a>],
    ) -> Ty<'a> {
        let mut decl = DataDecl::new()
            .members(members.iter().copied())
            .generics(generics.iter().copied());
        decl.is_union = is_union;
        self.define(name, decl)
    }

    /// Defines `name` from a full declaration.
    ///
    /// A stub is populated in place. Redefining a complete declaration
    /// keeps the first definition. Without generics in `decl`, the ones
    /// given to [`TypeArena::declare_generic`] are kept.
    pub fn define(&self, name: &str, decl: DataDecl<'a>) -> Ty<'a> {
        let ty = self.get_or_declare(name);
        let Some(dt) = ty.as_data() else {
            return ty;
        };
        if !dt.is_stub() {
            tracing::warn!(name, "type is already defined; keeping the first definition");
            return ty;
        }

        let fields: Vec<Ident<'a>> = decl.fields.iter().map(|f| self.ident(f)).collect();
        let tags: Vec<Tag<'a>> = decl
            .tags
            .iter()
            .map(|(tag, value)| Tag {
                name: self.ident(tag),
                value: *value,
            })
            .collect();
        let trait_impls: Vec<Ident<'a>> = decl.trait_impls.iter().map(|t| self.ident(t)).collect();
        let generics = if decl.generics.is_empty() {
            dt.generics()
        } else {
            self.alloc_slice(&decl.generics)
        };

        dt.set_def(DataDef {
            state: DataState::Complete,
            is_union: decl.is_union,
            is_alias: decl.is_alias,
            members: self.alloc_slice(&decl.members),
            fields: self.alloc_slice(&fields),
            tags: self.alloc_slice(&tags),
            parent_union: decl.parent_union,
            generics,
            bound_generics: &[],
            unbound: None,
            trait_impls: self.alloc_slice(&trait_impls),
        });
        if !generics.is_empty() {
            dt.set_flags(TyFlags::HAS_TYPE_VARS);
        }
        tracing::debug!(name, generic = !generics.is_empty(), "completed declaration");
        ty
    }
}
