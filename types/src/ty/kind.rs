use core::fmt;

use smallvec::SmallVec;

use super::flags::TyFlags;
use super::handle::{Ident, Ty};
use crate::arena::TypeArena;
use crate::data::DataType;

/// The shape of an interned type.
///
/// Every variant except `Data` is hash-consed by its structural content, so
/// two handles with the same kind are the same handle. Nominal types are
/// interned by name (declarations) or by their bindings (variants).
#[derive(Debug)]
pub enum TyKind<'a> {
    /// One of the fixed primitive singletons.
    Primitive(Primitive),

    /// Pointer to exactly one inner type.
    Pointer(Ty<'a>),

    /// Fixed-size array. A length of `0` means an unsized slice.
    Array { elem: Ty<'a>, len: u64 },

    /// Ordered member list tagged with its aggregate kind.
    Aggregate {
        kind: AggregateKind,
        members: &'a [Ty<'a>],
    },

    /// Function signature. Meta functions run at compile time.
    Function {
        ret: Ty<'a>,
        params: &'a [Ty<'a>],
        is_meta: bool,
    },

    /// Named placeholder used inside generic declarations.
    TypeVar(Ident<'a>),

    /// User-declared struct or tagged union.
    Data(DataType<'a>),

    /// Qualifier or directive layered over an inner type.
    Modifier { inner: Ty<'a>, modifier: Modifier },
}

impl<'a> TyKind<'a> {
    pub fn compute_flags(&self) -> TyFlags {
        match self {
            TyKind::Primitive(_) => TyFlags::empty(),
            TyKind::Pointer(inner) => inner.flags(),
            TyKind::Array { elem, .. } => elem.flags(),
            TyKind::Aggregate { members, .. } => members
                .iter()
                .fold(TyFlags::empty(), |acc, ty| acc | ty.flags()),
            TyKind::Function { ret, params, .. } => {
                let param_flags = params
                    .iter()
                    .fold(TyFlags::empty(), |acc, ty| acc | ty.flags());
                param_flags | ret.flags()
            }
            TyKind::TypeVar(_) => TyFlags::HAS_TYPE_VARS,
            TyKind::Data(dt) => dt.flags(),
            TyKind::Modifier { inner, .. } => inner.flags() | TyFlags::HAS_MODIFIERS,
        }
    }

    /// Number of concrete type nodes matched by this shape.
    ///
    /// Used as a specificity score: the more concrete structure a type pins
    /// down, the higher the count. Type variables match nothing.
    pub fn compute_matched(&self) -> u32 {
        match self {
            TyKind::Primitive(_) => 1,
            TyKind::Pointer(inner) => inner.matched_tys() + 1,
            TyKind::Array { elem, .. } => elem.matched_tys() + 1,
            TyKind::Aggregate { members, .. } => {
                members.iter().map(|m| m.matched_tys()).sum::<u32>() + 1
            }
            TyKind::Function { ret, params, .. } => {
                params.iter().map(|p| p.matched_tys()).sum::<u32>() + ret.matched_tys() + 1
            }
            TyKind::TypeVar(_) => 0,
            TyKind::Data(dt) => dt.matched_tys(),
            TyKind::Modifier { inner, .. } => inner.matched_tys(),
        }
    }

    /// Structural children in definition order.
    ///
    /// - `Pointer`, `Array`, `Modifier`: `[inner]`
    /// - `Aggregate`: `[member0, member1, ...]`
    /// - `Function`: `[param0, param1, ..., ret]`
    /// - Leaves (Primitive, TypeVar, Data): `[]`
    ///
    /// Nominal types are leaves here; their members are reached through the
    /// binding engine, not through structural traversal.
    pub fn children(&self) -> SmallVec<[Ty<'a>; 4]> {
        match self {
            TyKind::Pointer(inner) | TyKind::Modifier { inner, .. } => smallvec::smallvec![*inner],
            TyKind::Array { elem, .. } => smallvec::smallvec![*elem],
            TyKind::Aggregate { members, .. } => members.iter().copied().collect(),
            TyKind::Function { ret, params, .. } => {
                params.iter().copied().chain(core::iter::once(*ret)).collect()
            }
            TyKind::Primitive(_) | TyKind::TypeVar(_) | TyKind::Data(_) => SmallVec::new(),
        }
    }

    /// Rebuilds `ty` (whose kind is `self`) from replacement children given
    /// in the order produced by [`TyKind::children`].
    pub fn from_children(
        &self,
        arena: &TypeArena<'a>,
        ty: Ty<'a>,
        children: impl Iterator<Item = Ty<'a>>,
    ) -> Ty<'a> {
        let mut children: SmallVec<[Ty<'a>; 4]> = children.collect();
        match self {
            TyKind::Pointer(_) => arena.pointer(children[0]),
            TyKind::Array { len, .. } => arena.array(children[0], *len),
            TyKind::Aggregate { kind, .. } => arena.aggregate(*kind, &children),
            TyKind::Function { is_meta, .. } => match children.pop() {
                Some(ret) => arena.function(ret, &children, *is_meta),
                None => ty,
            },
            TyKind::Modifier { modifier, .. } => arena.wrap(children[0], *modifier),
            TyKind::Primitive(_) | TyKind::TypeVar(_) | TyKind::Data(_) => ty,
        }
    }
}

/// Primitive type singletons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    I8,
    I16,
    I32,
    I64,
    Isz,
    U8,
    U16,
    U32,
    U64,
    Usz,
    F16,
    F32,
    F64,
    C8,
    C32,
    Bool,
    Void,
    /// The type of types.
    Type,
    /// Marker for an overloaded set of functions.
    FunctionList,
}

impl Primitive {
    pub const COUNT: usize = 19;

    pub const ALL: [Primitive; Self::COUNT] = [
        Primitive::I8,
        Primitive::I16,
        Primitive::I32,
        Primitive::I64,
        Primitive::Isz,
        Primitive::U8,
        Primitive::U16,
        Primitive::U32,
        Primitive::U64,
        Primitive::Usz,
        Primitive::F16,
        Primitive::F32,
        Primitive::F64,
        Primitive::C8,
        Primitive::C32,
        Primitive::Bool,
        Primitive::Void,
        Primitive::Type,
        Primitive::FunctionList,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::Isz => "isz",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::Usz => "usz",
            Primitive::F16 => "f16",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::C8 => "c8",
            Primitive::C32 => "c32",
            Primitive::Bool => "bool",
            Primitive::Void => "void",
            Primitive::Type => "Type",
            Primitive::FunctionList => "FunctionList",
        }
    }

    pub fn tag(self) -> TypeTag {
        match self {
            Primitive::I8 => TypeTag::I8,
            Primitive::I16 => TypeTag::I16,
            Primitive::I32 => TypeTag::I32,
            Primitive::I64 => TypeTag::I64,
            Primitive::Isz => TypeTag::Isz,
            Primitive::U8 => TypeTag::U8,
            Primitive::U16 => TypeTag::U16,
            Primitive::U32 => TypeTag::U32,
            Primitive::U64 => TypeTag::U64,
            Primitive::Usz => TypeTag::Usz,
            Primitive::F16 => TypeTag::F16,
            Primitive::F32 => TypeTag::F32,
            Primitive::F64 => TypeTag::F64,
            Primitive::C8 => TypeTag::C8,
            Primitive::C32 => TypeTag::C32,
            Primitive::Bool => TypeTag::Bool,
            Primitive::Void => TypeTag::Void,
            Primitive::Type => TypeTag::Type,
            Primitive::FunctionList => TypeTag::FunctionList,
        }
    }

    /// Returns the primitive for `tag`, or `None` for compound shapes.
    pub fn from_tag(tag: TypeTag) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

/// Shape discriminator shared by type syntax and interned types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    I8,
    I16,
    I32,
    I64,
    Isz,
    U8,
    U16,
    U32,
    U64,
    Usz,
    F16,
    F32,
    F64,
    C8,
    C32,
    Bool,
    Void,
    Type,
    FunctionList,
    Ptr,
    Array,
    Tuple,
    Function,
    MetaFunction,
    Data,
    TaggedUnion,
    TypeVar,
    Trait,
    Modifier,
}

impl TypeTag {
    pub fn is_primitive(self) -> bool {
        Primitive::from_tag(self).is_some()
    }

    pub fn name(self) -> &'static str {
        match Primitive::from_tag(self) {
            Some(p) => p.keyword(),
            None => match self {
                TypeTag::Ptr => "Ptr",
                TypeTag::Array => "Array",
                TypeTag::Tuple => "Tuple",
                TypeTag::Function => "Function",
                TypeTag::MetaFunction => "MetaFunction",
                TypeTag::Data => "Data",
                TypeTag::TaggedUnion => "TaggedUnion",
                TypeTag::TypeVar => "TypeVar",
                TypeTag::Trait => "Trait",
                _ => "Modifier",
            },
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-kind of an aggregate. Only tuples exist today.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Tuple,
}

/// Qualifier tokens that can be layered onto a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Mut,
    /// Immutable. Absorbs a later `Mut` request.
    Const,
    /// Carries no type distinction; applying it is a no-op.
    Let,
}

impl Qualifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Qualifier::Mut => "mut",
            Qualifier::Const => "const",
            Qualifier::Let => "let",
        }
    }
}

/// Opaque identity of a compiler-directive expression in the syntax tree.
///
/// Directives are compared by identity only; the expression itself belongs
/// to the parser and is never interpreted here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectiveId(u32);

impl DirectiveId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// The wrapper carried by a `TyKind::Modifier` node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Basic(Qualifier),
    Directive(DirectiveId),
}
