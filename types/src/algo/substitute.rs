use crate::arena::TypeArena;
use crate::binding::{VariantHook, filter_matching};
use crate::error::TypeError;
use crate::traversal::{Fold, FoldStep, drive_fold};
use crate::ty::{Binding, Ty, TyKind};

/// Replaces type variables by their bound types, re-interning every node
/// on the way up.
///
/// Replacements are final: a bound type is not substituted again, so a
/// binding like `t -> 't` is stable. Qualifier chains are re-applied with
/// [`TypeArena::add_modifiers_to`] onto the substituted core. Nominal types
/// are rebound through [`TypeArena::get_variant`] with the bindings that
/// name their own open parameters.
struct Substitute<'b, 'h, 'a> {
    bindings: &'b [Binding<'a>],
    hook: &'h mut dyn VariantHook<'a>,
}

impl<'b, 'h, 'a> Fold<'a> for Substitute<'b, 'h, 'a> {
    type Output = Ty<'a>;
    type Error = TypeError;

    fn visit(
        &mut self,
        arena: &TypeArena<'a>,
        ty: Ty<'a>,
    ) -> Result<FoldStep<'a, Ty<'a>>, TypeError> {
        if !ty.is_generic() {
            return Ok(FoldStep::Done(ty));
        }
        match ty.kind() {
            TyKind::TypeVar(name) => {
                let bound = self
                    .bindings
                    .iter()
                    .find(|b| b.name == *name)
                    .map_or(ty, |b| b.ty);
                Ok(FoldStep::Done(bound))
            }
            TyKind::Data(dt) => {
                let filtered = filter_matching(dt.generics(), self.bindings);
                if filtered.is_empty() {
                    return Ok(FoldStep::Done(ty));
                }
                let variant = arena.get_variant(ty, &filtered, &mut *self.hook)?;
                Ok(FoldStep::Done(variant))
            }
            // The bound core may carry qualifiers of its own, so the chain is
            // replayed through the qualifier rules instead of rewrapped.
            TyKind::Modifier { .. } => {
                let core =
                    arena.substitute(ty.strip_modifiers(), self.bindings, &mut *self.hook)?;
                Ok(FoldStep::Done(arena.add_modifiers_to(ty, core)))
            }
            _ => Ok(FoldStep::Recurse),
        }
    }

    fn combine(
        &mut self,
        arena: &TypeArena<'a>,
        ty: Ty<'a>,
        children: impl ExactSizeIterator<Item = Ty<'a>> + DoubleEndedIterator,
    ) -> Result<Ty<'a>, TypeError> {
        Ok(ty.kind().from_children(arena, ty, children))
    }
}

impl<'a> TypeArena<'a> {
    /// Substitutes `bindings` into `ty`.
    pub fn substitute(
        &self,
        ty: Ty<'a>,
        bindings: &[Binding<'a>],
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        if bindings.is_empty() || !ty.is_generic() {
            return Ok(ty);
        }
        drive_fold(self, ty, &mut Substitute { bindings, hook })
    }
}
