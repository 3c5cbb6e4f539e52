use core::cell::RefCell;
use core::fmt;
use core::hash::{Hash, Hasher};

use bumpalo::Bump;
use hashbrown::{Equivalent, HashMap, HashSet};

use crate::error::TypeError;
use crate::ty::{
    AggregateKind, Binding, DirectiveId, Ident, Modifier, Primitive, Qualifier, Ty, TyBuildHasher,
    TyKind, TyNode, TypeTag,
};

/// Ownership root for every type node of one compilation.
///
/// Nodes are allocated in a caller-owned `Bump` and never freed or moved,
/// so handles stay valid for as long as the arena's backing memory lives.
/// Each shape has its own lookup-or-insert table keyed by the full
/// structural content; a hit is always confirmed by equality, never by
/// hash alone.
///
/// # Example
///
/// ```
/// use anvil_types::{TypeArena, Primitive};
/// use bumpalo::Bump;
///
/// let bump = Bump::new();
/// let arena = TypeArena::new(&bump);
///
/// let int_ty = arena.primitive(Primitive::I32);
/// let ptr_ty = arena.pointer(int_ty);
///
/// // Structurally equal requests return the same handle.
/// assert_eq!(ptr_ty, arena.pointer(int_ty));
/// ```
pub struct TypeArena<'a> {
    bump: &'a Bump,
    primitives: [Ty<'a>; Primitive::COUNT],
    tables: RefCell<Tables<'a>>,
}

struct Tables<'a> {
    idents: HashSet<&'a str, TyBuildHasher>,
    pointers: HashMap<Ty<'a>, Ty<'a>, TyBuildHasher>,
    arrays: HashMap<(Ty<'a>, u64), Ty<'a>, TyBuildHasher>,
    aggregates: HashMap<AggregateKey<'a>, Ty<'a>, TyBuildHasher>,
    functions: HashMap<FunctionKey<'a>, Ty<'a>, TyBuildHasher>,
    type_vars: HashMap<Ident<'a>, Ty<'a>, TyBuildHasher>,
    modifiers: HashMap<(Ty<'a>, Modifier), Ty<'a>, TyBuildHasher>,
    declared: HashMap<Ident<'a>, Ty<'a>, TyBuildHasher>,
    variants: HashMap<VariantKey<'a>, Ty<'a>, TyBuildHasher>,
}

impl<'a> Default for Tables<'a> {
    fn default() -> Self {
        Self {
            idents: HashSet::with_capacity_and_hasher(256, TyBuildHasher::default()),
            pointers: HashMap::default(),
            arrays: HashMap::default(),
            aggregates: HashMap::default(),
            functions: HashMap::default(),
            type_vars: HashMap::default(),
            modifiers: HashMap::default(),
            declared: HashMap::default(),
            variants: HashMap::default(),
        }
    }
}

// Stored keys own arena slices; queries borrow caller slices so a lookup
// never allocates. Query types deliberately do not implement `Eq`, which
// keeps them out of hashbrown's blanket `Equivalent` impl. Both sides must
// hash the same fields in the same order.

#[derive(PartialEq, Eq, Hash)]
struct AggregateKey<'a> {
    kind: AggregateKind,
    members: &'a [Ty<'a>],
}

struct AggregateQuery<'q, 'a> {
    kind: AggregateKind,
    members: &'q [Ty<'a>],
}

impl Hash for AggregateQuery<'_, '_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.members.hash(state);
    }
}

impl<'a> Equivalent<AggregateKey<'a>> for AggregateQuery<'_, 'a> {
    fn equivalent(&self, key: &AggregateKey<'a>) -> bool {
        self.kind == key.kind && self.members == key.members
    }
}

#[derive(PartialEq, Eq, Hash)]
struct FunctionKey<'a> {
    ret: Ty<'a>,
    params: &'a [Ty<'a>],
    is_meta: bool,
}

struct FunctionQuery<'q, 'a> {
    ret: Ty<'a>,
    params: &'q [Ty<'a>],
    is_meta: bool,
}

impl Hash for FunctionQuery<'_, '_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ret.hash(state);
        self.params.hash(state);
        self.is_meta.hash(state);
    }
}

impl<'a> Equivalent<FunctionKey<'a>> for FunctionQuery<'_, 'a> {
    fn equivalent(&self, key: &FunctionKey<'a>) -> bool {
        self.ret == key.ret && self.params == key.params && self.is_meta == key.is_meta
    }
}

/// Bound variants are keyed by their root declaration and the exact,
/// ordered binding list.
#[derive(PartialEq, Eq, Hash)]
pub(crate) struct VariantKey<'a> {
    pub(crate) root: Ty<'a>,
    pub(crate) bindings: &'a [Binding<'a>],
}

pub(crate) struct VariantQuery<'q, 'a> {
    pub(crate) root: Ty<'a>,
    pub(crate) bindings: &'q [Binding<'a>],
}

impl Hash for VariantQuery<'_, '_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.bindings.hash(state);
    }
}

impl<'a> Equivalent<VariantKey<'a>> for VariantQuery<'_, 'a> {
    fn equivalent(&self, key: &VariantKey<'a>) -> bool {
        self.root == key.root && self.bindings == key.bindings
    }
}

/// Per-table sizes, for tests and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    pub primitives: usize,
    pub idents: usize,
    pub pointers: usize,
    pub arrays: usize,
    pub aggregates: usize,
    pub functions: usize,
    pub type_vars: usize,
    pub modifiers: usize,
    pub declared: usize,
    pub variants: usize,
}

macro_rules! primitive_getters {
    ($($name:ident => $prim:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&self) -> Ty<'a> {
                self.primitive(Primitive::$prim)
            }
        )*
    };
}

impl<'a> TypeArena<'a> {
    /// Create a new arena and its primitive singletons.
    pub fn new(bump: &'a Bump) -> Self {
        let primitives = Primitive::ALL
            .map(|p| Ty::from_node(bump.alloc(TyNode::new(TyKind::Primitive(p)))));
        Self {
            bump,
            primitives,
            tables: RefCell::new(Tables::default()),
        }
    }

    pub fn bump(&self) -> &'a Bump {
        self.bump
    }

    pub(crate) fn alloc_node(&self, kind: TyKind<'a>) -> Ty<'a> {
        Ty::from_node(self.bump.alloc(TyNode::new(kind)))
    }

    pub(crate) fn alloc_slice<T: Copy>(&self, items: &[T]) -> &'a [T] {
        if items.is_empty() {
            return &[];
        }
        self.bump.alloc_slice_copy(items)
    }

    /// Intern an identifier. Equal strings yield equal (pointer-identical)
    /// identifiers.
    pub fn ident(&self, name: &str) -> Ident<'a> {
        let mut tables = self.tables.borrow_mut();
        if let Some(&interned) = tables.idents.get(name) {
            return Ident::from_interned(interned);
        }
        let allocated: &'a str = self.bump.alloc_str(name);
        tables.idents.insert(allocated);
        Ident::from_interned(allocated)
    }

    // === Primitives ===

    pub fn primitive(&self, primitive: Primitive) -> Ty<'a> {
        self.primitives[primitive.index()]
    }

    /// Primitive singleton for a shape discriminator.
    ///
    /// Asking for a compound shape is a bug in the caller.
    pub fn get_primitive_by_tag(&self, tag: TypeTag) -> Result<Ty<'a>, TypeError> {
        match Primitive::from_tag(tag) {
            Some(p) => Ok(self.primitive(p)),
            None => {
                tracing::error!(%tag, "requested primitive for a non-primitive type tag");
                Err(TypeError::NotPrimitive(tag))
            }
        }
    }

    primitive_getters! {
        i8 => I8,
        i16 => I16,
        i32 => I32,
        i64 => I64,
        isz => Isz,
        u8 => U8,
        u16 => U16,
        u32 => U32,
        u64 => U64,
        usz => Usz,
        f16 => F16,
        f32 => F32,
        f64 => F64,
        c8 => C8,
        c32 => C32,
        bool => Bool,
        void => Void,
        type_ => Type,
        function_list => FunctionList,
    }

    // === Structural shapes ===

    pub fn pointer(&self, inner: Ty<'a>) -> Ty<'a> {
        let mut tables = self.tables.borrow_mut();
        *tables
            .pointers
            .entry(inner)
            .or_insert_with(|| self.alloc_node(TyKind::Pointer(inner)))
    }

    /// Array of `len` elements; `0` denotes an unsized slice.
    pub fn array(&self, elem: Ty<'a>, len: u64) -> Ty<'a> {
        let mut tables = self.tables.borrow_mut();
        *tables
            .arrays
            .entry((elem, len))
            .or_insert_with(|| self.alloc_node(TyKind::Array { elem, len }))
    }

    pub fn aggregate(&self, kind: AggregateKind, members: &[Ty<'a>]) -> Ty<'a> {
        let mut tables = self.tables.borrow_mut();
        let query = AggregateQuery { kind, members };
        if let Some(&existing) = tables.aggregates.get(&query) {
            return existing;
        }
        let members = self.alloc_slice(members);
        let ty = self.alloc_node(TyKind::Aggregate { kind, members });
        tracing::trace!(%ty, "interned aggregate");
        tables.aggregates.insert(AggregateKey { kind, members }, ty);
        ty
    }

    pub fn tuple(&self, members: &[Ty<'a>]) -> Ty<'a> {
        self.aggregate(AggregateKind::Tuple, members)
    }

    pub fn function(&self, ret: Ty<'a>, params: &[Ty<'a>], is_meta: bool) -> Ty<'a> {
        let mut tables = self.tables.borrow_mut();
        let query = FunctionQuery {
            ret,
            params,
            is_meta,
        };
        if let Some(&existing) = tables.functions.get(&query) {
            return existing;
        }
        let params = self.alloc_slice(params);
        let ty = self.alloc_node(TyKind::Function {
            ret,
            params,
            is_meta,
        });
        tracing::trace!(%ty, "interned function");
        tables.functions.insert(
            FunctionKey {
                ret,
                params,
                is_meta,
            },
            ty,
        );
        ty
    }

    /// Type variable by name. Equal names are the same node everywhere.
    pub fn type_var(&self, name: &str) -> Ty<'a> {
        let name = self.ident(name);
        let mut tables = self.tables.borrow_mut();
        *tables
            .type_vars
            .entry(name)
            .or_insert_with(|| self.alloc_node(TyKind::TypeVar(name)))
    }

    // === Modifier wrappers ===

    /// Raw lookup-or-insert for a wrapper node. Composition rules live in
    /// [`TypeArena::add_modifier`].
    pub(crate) fn wrap(&self, inner: Ty<'a>, modifier: Modifier) -> Ty<'a> {
        let mut tables = self.tables.borrow_mut();
        *tables
            .modifiers
            .entry((inner, modifier))
            .or_insert_with(|| self.alloc_node(TyKind::Modifier { inner, modifier }))
    }

    /// Wrap `inner` in a single qualifier without applying composition rules.
    pub fn basic_modifier(&self, inner: Ty<'a>, qualifier: Qualifier) -> Ty<'a> {
        self.wrap(inner, Modifier::Basic(qualifier))
    }

    /// Wrap `inner` in a compiler directive. Directives always sit outermost.
    pub fn directive(&self, inner: Ty<'a>, directive: DirectiveId) -> Ty<'a> {
        self.wrap(inner, Modifier::Directive(directive))
    }

    // === Nominal tables ===

    pub(crate) fn lookup_declared(&self, name: Ident<'a>) -> Option<Ty<'a>> {
        self.tables.borrow().declared.get(&name).copied()
    }

    pub(crate) fn insert_declared(&self, name: Ident<'a>, ty: Ty<'a>) {
        self.tables.borrow_mut().declared.insert(name, ty);
    }

    pub(crate) fn lookup_variant(&self, root: Ty<'a>, bindings: &[Binding<'a>]) -> Option<Ty<'a>> {
        let query = VariantQuery { root, bindings };
        self.tables.borrow().variants.get(&query).copied()
    }

    pub(crate) fn insert_variant(&self, root: Ty<'a>, bindings: &'a [Binding<'a>], ty: Ty<'a>) {
        self.tables
            .borrow_mut()
            .variants
            .insert(VariantKey { root, bindings }, ty);
    }

    pub fn stats(&self) -> ArenaStats {
        let tables = self.tables.borrow();
        ArenaStats {
            primitives: self.primitives.len(),
            idents: tables.idents.len(),
            pointers: tables.pointers.len(),
            arrays: tables.arrays.len(),
            aggregates: tables.aggregates.len(),
            functions: tables.functions.len(),
            type_vars: tables.type_vars.len(),
            modifiers: tables.modifiers.len(),
            declared: tables.declared.len(),
            variants: tables.variants.len(),
        }
    }
}

impl<'a> fmt::Debug for TypeArena<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeArena")
            .field("bump", &(self.bump as *const Bump))
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
