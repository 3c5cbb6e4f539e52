//! Type syntax as produced by the parser.
//!
//! The parser owns the real syntax tree; this is the subset lowering reads.
//! Children are stored in `elems` whose meaning depends on `tag`:
//! - `Function`, `MetaFunction`, `FunctionList`: return type, then parameters
//! - `Tuple`: members
//! - `Array`, `Ptr`: the single element or pointee
//!
//! Nominal references carry their name in `name` and explicit type
//! arguments in `args`.

use alloc::string::String;
use alloc::vec::Vec;

use crate::ty::{DirectiveId, Primitive, Qualifier, TypeTag};

/// One entry of a syntax node's modifier list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierSyntax {
    Qualifier(Qualifier),
    Directive(DirectiveId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSyntax {
    pub tag: TypeTag,
    pub name: Option<String>,
    pub elems: Vec<TypeSyntax>,
    /// Integer literal text for an array length.
    pub len: Option<String>,
    pub args: Vec<TypeSyntax>,
    pub modifiers: Vec<ModifierSyntax>,
}

impl TypeSyntax {
    /// A bare node for `tag` with no children.
    pub fn raw(tag: TypeTag) -> Self {
        Self {
            tag,
            name: None,
            elems: Vec::new(),
            len: None,
            args: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::raw(primitive.tag())
    }

    pub fn pointer(pointee: TypeSyntax) -> Self {
        Self {
            elems: alloc::vec![pointee],
            ..Self::raw(TypeTag::Ptr)
        }
    }

    /// An array of `elem`. Without a length the array is unsized.
    pub fn array(elem: TypeSyntax, len: Option<&str>) -> Self {
        Self {
            elems: alloc::vec![elem],
            len: len.map(String::from),
            ..Self::raw(TypeTag::Array)
        }
    }

    pub fn tuple(members: impl IntoIterator<Item = TypeSyntax>) -> Self {
        Self {
            elems: members.into_iter().collect(),
            ..Self::raw(TypeTag::Tuple)
        }
    }

    pub fn function(ret: TypeSyntax, params: impl IntoIterator<Item = TypeSyntax>) -> Self {
        Self::function_like(TypeTag::Function, ret, params)
    }

    pub fn meta_function(ret: TypeSyntax, params: impl IntoIterator<Item = TypeSyntax>) -> Self {
        Self::function_like(TypeTag::MetaFunction, ret, params)
    }

    fn function_like(
        tag: TypeTag,
        ret: TypeSyntax,
        params: impl IntoIterator<Item = TypeSyntax>,
    ) -> Self {
        let mut elems = alloc::vec![ret];
        elems.extend(params);
        Self {
            elems,
            ..Self::raw(tag)
        }
    }

    /// A reference to the struct named `name`.
    pub fn data(name: impl Into<String>, args: impl IntoIterator<Item = TypeSyntax>) -> Self {
        Self {
            name: Some(name.into()),
            args: args.into_iter().collect(),
            ..Self::raw(TypeTag::Data)
        }
    }

    /// A reference to the tagged union named `name`.
    pub fn tagged_union(
        name: impl Into<String>,
        args: impl IntoIterator<Item = TypeSyntax>,
    ) -> Self {
        Self {
            tag: TypeTag::TaggedUnion,
            ..Self::data(name, args)
        }
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::raw(TypeTag::TypeVar)
        }
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.modifiers.push(ModifierSyntax::Qualifier(qualifier));
        self
    }

    pub fn with_directive(mut self, directive: DirectiveId) -> Self {
        self.modifiers.push(ModifierSyntax::Directive(directive));
        self
    }
}
