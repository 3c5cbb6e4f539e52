//! Human-readable rendering of types.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::data::DataType;
use crate::ty::{Binding, Modifier, Ty, TyKind};

fn write_list<'a>(f: &mut fmt::Formatter<'_>, tys: &[Ty<'a>]) -> fmt::Result {
    for (i, ty) in tys.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

/// Writes `base<A,B>`, leaving a blank for arguments that are still type
/// variables. Nothing concrete means just `base`.
fn write_bound_name<W: Write>(out: &mut W, base: &str, bindings: &[Binding<'_>]) -> fmt::Result {
    out.write_str(base)?;
    let concrete = |b: &Binding<'_>| !matches!(b.ty.strip_modifiers().kind(), TyKind::TypeVar(_));
    if !bindings.iter().any(concrete) {
        return Ok(());
    }
    out.write_char('<')?;
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        if concrete(binding) {
            write!(out, "{}", binding.ty)?;
        }
    }
    out.write_char('>')
}

/// The unique display name of `base` bound with `bindings`.
///
/// ```
/// use anvil_types::{bound_name, Binding, TypeArena};
/// use bumpalo::Bump;
///
/// let bump = Bump::new();
/// let arena = TypeArena::new(&bump);
///
/// let bindings = [
///     Binding::new(arena.ident("a"), arena.i32()),
///     Binding::new(arena.ident("b"), arena.type_var("b")),
/// ];
/// assert_eq!(bound_name("Pair", &bindings), "Pair<i32,>");
/// assert_eq!(bound_name("Pair", &bindings[1..]), "Pair");
/// ```
pub fn bound_name(base: &str, bindings: &[Binding<'_>]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_bound_name(&mut out, base, bindings);
    out
}

impl<'a> fmt::Display for Ty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TyKind::Primitive(p) => f.write_str(p.keyword()),
            TyKind::Pointer(inner) => write!(f, "{inner}*"),
            TyKind::Array { elem, len: 0 } => write!(f, "[{elem}]"),
            TyKind::Array { elem, len } => write!(f, "[{elem}; {len}]"),
            TyKind::Aggregate { members, .. } => {
                f.write_str("(")?;
                write_list(f, members)?;
                f.write_str(")")
            }
            TyKind::Function {
                ret,
                params,
                is_meta,
            } => {
                if *is_meta {
                    f.write_str("meta ")?;
                }
                f.write_str("fn(")?;
                write_list(f, params)?;
                write!(f, ") -> {ret}")
            }
            TyKind::TypeVar(name) => {
                let name = name.as_str();
                if name.starts_with('\'') {
                    f.write_str(name)
                } else {
                    write!(f, "'{name}")
                }
            }
            TyKind::Data(dt) => write_bound_name(f, dt.name().as_str(), dt.bound_generics()),
            TyKind::Modifier {
                inner,
                modifier: Modifier::Basic(q),
            } => write!(f, "{} {inner}", q.keyword()),
            TyKind::Modifier {
                inner,
                modifier: Modifier::Directive(d),
            } => write!(f, "#[directive {}] {inner}", d.as_u32()),
        }
    }
}

/// Debug rendering of a nominal declaration, see [`DataType::dump`].
pub struct DataDump<'d, 'a>(&'d DataType<'a>);

impl<'a> DataType<'a> {
    /// Renders the declaration with its parameters, bindings and members:
    /// `Name['t]<t -> i32> = (i32*, usz)`.
    pub fn dump(&self) -> DataDump<'_, 'a> {
        DataDump(self)
    }

    pub fn bound_name(&self) -> String {
        bound_name(self.name().as_str(), self.bound_generics())
    }
}

impl fmt::Display for DataDump<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.0;
        f.write_str(dt.name().as_str())?;
        if !dt.generics().is_empty() {
            f.write_str("[")?;
            write_list(f, dt.generics())?;
            f.write_str("]")?;
        }
        if !dt.bound_generics().is_empty() {
            f.write_str("<")?;
            for (i, b) in dt.bound_generics().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} -> {}", b.name, b.ty)?;
            }
            f.write_str(">")?;
        }
        if dt.is_stub() {
            return f.write_str(" = <stub>");
        }
        f.write_str(" = ")?;
        if dt.is_union() {
            for (i, member) in dt.members().iter().enumerate() {
                if i > 0 {
                    f.write_str(" | ")?;
                }
                write!(f, "{member}")?;
            }
            Ok(())
        } else {
            f.write_str("(")?;
            write_list(f, dt.members())?;
            f.write_str(")")
        }
    }
}
