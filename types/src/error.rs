//! Errors raised while canonicalizing and binding types.
//!
//! Two classes share one enum. Internal faults (see [`TypeError::is_internal`])
//! mean an upstream pass handed over something malformed and the current
//! compilation unit should be abandoned. The rest are user-facing
//! diagnostics that callers may report and continue past.

use alloc::string::String;

use thiserror::Error;

use crate::ty::TypeTag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type tag `{0}` is not primitive")]
    NotPrimitive(TypeTag),

    #[error("unknown type syntax `{0}`")]
    UnknownSyntax(TypeTag),

    #[error("malformed `{tag}` type syntax: {reason}")]
    MalformedSyntax { tag: TypeTag, reason: &'static str },

    #[error("`{ty}` is not a nominal data type")]
    NotNominal { ty: String },

    #[error("invalid array length `{0}`")]
    InvalidArrayLength(String),

    #[error("no value found for tag `{tag}` of type `{ty}`")]
    UnknownTag { ty: String, tag: String },

    #[error("`{ty}` expects {expected} type argument(s) but {found} were supplied")]
    ArityMismatch {
        ty: String,
        expected: usize,
        found: usize,
    },
}

impl TypeError {
    /// True for faults caused by a bug in the caller rather than by the
    /// program being compiled.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TypeError::NotPrimitive(_)
                | TypeError::UnknownSyntax(_)
                | TypeError::MalformedSyntax { .. }
                | TypeError::NotNominal { .. }
        )
    }
}
