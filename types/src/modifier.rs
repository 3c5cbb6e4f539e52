//! Qualifier composition.
//!
//! Wrappers are interned like every other shape, so the rules below decide
//! which canonical chain a request lands on:
//! - `let` never changes a type.
//! - A repeated qualifier, or `mut` over `const`, returns the type as is.
//! - A new qualifier is pushed under the existing ones, closest to the
//!   core type.
//! - Directive wrappers always stay outermost.

use crate::arena::TypeArena;
use crate::ty::{Modifier, Qualifier, Ty, TyKind};

impl<'a> TypeArena<'a> {
    /// Applies `qualifier` to `ty`.
    ///
    /// ```
    /// use anvil_types::{Qualifier, TypeArena};
    /// use bumpalo::Bump;
    ///
    /// let bump = Bump::new();
    /// let arena = TypeArena::new(&bump);
    ///
    /// let c = arena.add_modifier(arena.i32(), Qualifier::Const);
    /// assert_eq!(arena.add_modifier(c, Qualifier::Mut), c);
    /// assert_eq!(arena.add_modifier(c, Qualifier::Let), c);
    /// ```
    pub fn add_modifier(&self, ty: Ty<'a>, qualifier: Qualifier) -> Ty<'a> {
        if qualifier == Qualifier::Let {
            return ty;
        }
        match ty.kind() {
            TyKind::Modifier {
                inner,
                modifier: Modifier::Basic(own),
            } => {
                if *own == qualifier || (*own == Qualifier::Const && qualifier == Qualifier::Mut) {
                    return ty;
                }
                let inner = self.add_modifier(*inner, qualifier);
                self.wrap(inner, Modifier::Basic(*own))
            }
            TyKind::Modifier {
                inner,
                modifier: Modifier::Directive(directive),
            } => {
                let inner = self.add_modifier(*inner, qualifier);
                self.wrap(inner, Modifier::Directive(*directive))
            }
            _ => self.wrap(ty, Modifier::Basic(qualifier)),
        }
    }

    /// Re-applies the wrapper chain of `modified` onto `base`, keeping the
    /// relative order of qualifiers and directives.
    ///
    /// The chain is replayed outermost first, since each new qualifier lands
    /// under the ones already applied.
    pub fn add_modifiers_to(&self, modified: Ty<'a>, base: Ty<'a>) -> Ty<'a> {
        modified.modifiers().fold(base, |acc, modifier| match modifier {
            Modifier::Basic(q) => self.add_modifier(acc, q),
            Modifier::Directive(d) => self.wrap(acc, Modifier::Directive(d)),
        })
    }
}
