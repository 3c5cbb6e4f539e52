//! Lowering of parsed type syntax into canonical types.

use alloc::string::String;

use smallvec::SmallVec;

use crate::arena::TypeArena;
use crate::binding::VariantHook;
use crate::error::TypeError;
use crate::syntax::{ModifierSyntax, TypeSyntax};
use crate::ty::{Primitive, Ty, TypeTag};

impl<'a> TypeArena<'a> {
    /// Lowers `syntax` to its canonical type, then applies its modifiers in
    /// order.
    ///
    /// Lowering a reference to a name that has no declaration yet creates a
    /// stub for it.
    ///
    /// ```
    /// use anvil_types::{NoBackend, Primitive, TypeArena, TypeSyntax};
    /// use bumpalo::Bump;
    ///
    /// let bump = Bump::new();
    /// let arena = TypeArena::new(&bump);
    ///
    /// let syntax = TypeSyntax::array(TypeSyntax::primitive(Primitive::I32), Some("4"));
    /// let ty = arena.lower(&syntax, &mut NoBackend).unwrap();
    /// assert_eq!(ty, arena.array(arena.i32(), 4));
    /// ```
    pub fn lower(
        &self,
        syntax: &TypeSyntax,
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        let mut ty = self.lower_shape(syntax, hook)?;
        for modifier in &syntax.modifiers {
            ty = match *modifier {
                ModifierSyntax::Qualifier(q) => self.add_modifier(ty, q),
                ModifierSyntax::Directive(d) => self.directive(ty, d),
            };
        }
        Ok(ty)
    }

    /// Like [`TypeArena::lower`], with absent syntax lowering to `void`.
    pub fn lower_optional(
        &self,
        syntax: Option<&TypeSyntax>,
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        match syntax {
            Some(syntax) => self.lower(syntax, hook),
            None => Ok(self.primitive(Primitive::Void)),
        }
    }

    fn lower_shape(
        &self,
        syntax: &TypeSyntax,
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        let tag = syntax.tag;
        match tag {
            TypeTag::Function | TypeTag::MetaFunction | TypeTag::FunctionList => {
                let mut chain = syntax.elems.iter();
                let ret = match chain.next() {
                    Some(ret) => self.lower(ret, hook)?,
                    None => self.void(),
                };
                let params = self.lower_all(chain, hook)?;
                Ok(self.function(ret, &params, tag == TypeTag::MetaFunction))
            }
            _ if tag.is_primitive() => self.get_primitive_by_tag(tag),
            TypeTag::Tuple => {
                let members = self.lower_all(syntax.elems.iter(), hook)?;
                Ok(self.tuple(&members))
            }
            TypeTag::Array => {
                let elem = self.lower(single_elem(syntax)?, hook)?;
                let len = match &syntax.len {
                    Some(literal) => parse_length(literal)?,
                    None => 0,
                };
                Ok(self.array(elem, len))
            }
            TypeTag::Ptr => {
                let pointee = self.lower(single_elem(syntax)?, hook)?;
                Ok(self.pointer(pointee))
            }
            TypeTag::Data | TypeTag::TaggedUnion => {
                let name = required_name(syntax)?;
                let declared = self.get_or_declare(name);
                if syntax.args.is_empty() {
                    return Ok(declared);
                }
                let args = self.lower_all(syntax.args.iter(), hook)?;
                self.bind_positional(declared, &args, hook)
            }
            TypeTag::TypeVar => Ok(self.type_var(required_name(syntax)?)),
            _ => {
                tracing::error!(%tag, "unknown type syntax");
                Err(TypeError::UnknownSyntax(tag))
            }
        }
    }

    fn lower_all<'s>(
        &self,
        syntax: impl Iterator<Item = &'s TypeSyntax>,
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<SmallVec<[Ty<'a>; 4]>, TypeError> {
        syntax.map(|s| self.lower(s, hook)).collect()
    }
}

fn single_elem(syntax: &TypeSyntax) -> Result<&TypeSyntax, TypeError> {
    match syntax.elems.as_slice() {
        [elem] => Ok(elem),
        _ => malformed(syntax.tag, "expected exactly one element type"),
    }
}

fn required_name(syntax: &TypeSyntax) -> Result<&str, TypeError> {
    match syntax.name.as_deref() {
        Some(name) => Ok(name),
        None => malformed(syntax.tag, "missing type name"),
    }
}

fn malformed<T>(tag: TypeTag, reason: &'static str) -> Result<T, TypeError> {
    tracing::error!(%tag, reason, "malformed type syntax");
    Err(TypeError::MalformedSyntax { tag, reason })
}

/// Parses an integer literal, accepting `_` digit separators.
fn parse_length(literal: &str) -> Result<u64, TypeError> {
    let digits: String = literal.chars().filter(|c| *c != '_').collect();
    digits.parse::<u64>().map_err(|_| {
        tracing::warn!(literal, "array length is not a valid size");
        TypeError::InvalidArrayLength(String::from(literal))
    })
}
