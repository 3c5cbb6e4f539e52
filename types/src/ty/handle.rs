use core::{fmt, hash};

use super::flags::TyFlags;
use super::kind::{Modifier, Primitive, Qualifier, TyKind, TypeTag};
use crate::data::DataType;

/// Canonical handle to an interned type.
///
/// Handles are compared and hashed by address. The arena guarantees that
/// structurally equal types share one node, so identity equality is
/// structural equality.
#[derive(Clone, Copy)]
pub struct Ty<'a>(&'a TyNode<'a>);

static_assertions::assert_eq_size!(Ty<'static>, usize);

impl<'a> Ty<'a> {
    pub(crate) fn from_node(node: &'a TyNode<'a>) -> Self {
        Self(node)
    }

    pub fn node(self) -> &'a TyNode<'a> {
        self.0
    }

    pub fn kind(self) -> &'a TyKind<'a> {
        self.0.kind()
    }

    pub fn flags(self) -> TyFlags {
        match self.kind() {
            TyKind::Data(dt) => dt.flags(),
            _ => self.0.flags,
        }
    }

    /// True iff an unbound type variable is reachable from this type.
    pub fn is_generic(self) -> bool {
        self.flags().contains(TyFlags::HAS_TYPE_VARS)
    }

    /// Specificity score used while matching bindings.
    pub fn matched_tys(self) -> u32 {
        match self.kind() {
            TyKind::Data(dt) => dt.matched_tys(),
            _ => self.0.matched,
        }
    }

    /// Shape discriminator. Modifier wrappers report the shape they wrap.
    pub fn tag(self) -> TypeTag {
        match self.kind() {
            TyKind::Primitive(p) => p.tag(),
            TyKind::Pointer(_) => TypeTag::Ptr,
            TyKind::Array { .. } => TypeTag::Array,
            TyKind::Aggregate { .. } => TypeTag::Tuple,
            TyKind::Function { is_meta: true, .. } => TypeTag::MetaFunction,
            TyKind::Function { .. } => TypeTag::Function,
            TyKind::TypeVar(_) => TypeTag::TypeVar,
            TyKind::Data(dt) if dt.is_union() => TypeTag::TaggedUnion,
            TyKind::Data(_) => TypeTag::Data,
            TyKind::Modifier { inner, .. } => inner.tag(),
        }
    }

    pub fn as_primitive(self) -> Option<Primitive> {
        match self.strip_modifiers().kind() {
            TyKind::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// The nominal declaration behind this handle, looking through modifiers.
    pub fn as_data(self) -> Option<&'a DataType<'a>> {
        match self.strip_modifiers().kind() {
            TyKind::Data(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn is_modified(self) -> bool {
        matches!(self.kind(), TyKind::Modifier { .. })
    }

    /// The core type under every qualifier and directive wrapper.
    pub fn strip_modifiers(self) -> Ty<'a> {
        let mut ty = self;
        while let TyKind::Modifier { inner, .. } = ty.kind() {
            ty = *inner;
        }
        ty
    }

    /// The wrapper chain, outermost first.
    pub fn modifiers(self) -> impl Iterator<Item = Modifier> + 'a {
        let mut ty = self;
        core::iter::from_fn(move || match ty.kind() {
            TyKind::Modifier { inner, modifier } => {
                ty = *inner;
                Some(*modifier)
            }
            _ => None,
        })
    }

    /// Reports whether `qualifier` appears anywhere in the wrapper chain.
    ///
    /// Directive wrappers are looked through without matching.
    pub fn has_modifier(self, qualifier: Qualifier) -> bool {
        self.modifiers()
            .any(|m| matches!(m, Modifier::Basic(q) if q == qualifier))
    }

    /// Return type of a function type, looking through modifiers.
    pub fn function_return_type(self) -> Option<Ty<'a>> {
        match self.strip_modifiers().kind() {
            TyKind::Function { ret, .. } => Some(*ret),
            _ => None,
        }
    }

    pub fn function_params(self) -> Option<&'a [Ty<'a>]> {
        match self.strip_modifiers().kind() {
            TyKind::Function { params, .. } => Some(*params),
            _ => None,
        }
    }
}

impl<'a> PartialEq for Ty<'a> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl<'a> Eq for Ty<'a> {}

impl<'a> hash::Hash for Ty<'a> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.0, state)
    }
}

impl<'a> fmt::Debug for Ty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty({})", self)
    }
}

/// An interned node: cached flags plus the shape.
pub struct TyNode<'a> {
    flags: TyFlags,
    matched: u32,
    kind: TyKind<'a>,
}

impl<'a> TyNode<'a> {
    pub fn new(kind: TyKind<'a>) -> Self {
        let flags = kind.compute_flags();
        let matched = kind.compute_matched();
        Self {
            flags,
            matched,
            kind,
        }
    }

    pub fn kind(&self) -> &TyKind<'a> {
        &self.kind
    }
}

/// An interned identifier with pointer-based equality.
///
/// Two `Ident` values are equal if and only if they point to the same
/// memory location. This is guaranteed since the arena deduplicates
/// identifiers during interning.
#[derive(Clone, Copy)]
pub struct Ident<'a>(&'a str);

impl<'a> Ident<'a> {
    pub(crate) fn from_interned(s: &'a str) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl<'a> AsRef<str> for Ident<'a> {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl<'a> fmt::Debug for Ident<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

impl<'a> fmt::Display for Ident<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl<'a> PartialEq for Ident<'a> {
    fn eq(&self, other: &Self) -> bool {
        // Compare the fat pointer so an empty string never aliases the
        // allocation that follows it.
        core::ptr::eq(self.0, other.0)
    }
}

impl<'a> Eq for Ident<'a> {}

impl<'a> hash::Hash for Ident<'a> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.0, state)
    }
}

/// One `type-variable name -> bound type` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Binding<'a> {
    pub name: Ident<'a>,
    pub ty: Ty<'a>,
}

impl<'a> Binding<'a> {
    pub fn new(name: Ident<'a>, ty: Ty<'a>) -> Self {
        Self { name, ty }
    }
}
