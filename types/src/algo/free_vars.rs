use alloc::vec::Vec;
use core::convert::Infallible;

use crate::arena::TypeArena;
use crate::traversal::{Fold, FoldStep, drive_fold};
use crate::ty::{Ty, TyKind};

/// Collects type variables in pre-order, skipping repeats.
#[derive(Default)]
struct FreeTypeVars<'a> {
    found: Vec<Ty<'a>>,
}

impl<'a> FreeTypeVars<'a> {
    fn push(&mut self, tv: Ty<'a>) {
        if !self.found.contains(&tv) {
            self.found.push(tv);
        }
    }
}

impl<'a> Fold<'a> for FreeTypeVars<'a> {
    type Output = ();
    type Error = Infallible;

    fn visit(&mut self, _arena: &TypeArena<'a>, ty: Ty<'a>) -> Result<FoldStep<'a, ()>, Infallible> {
        if !ty.is_generic() {
            return Ok(FoldStep::Done(()));
        }
        match ty.kind() {
            TyKind::TypeVar(_) => self.push(ty),
            // A nominal type reports its open parameters rather than what
            // its members mention.
            TyKind::Data(dt) => dt.generics().iter().for_each(|g| self.push(*g)),
            _ => return Ok(FoldStep::Recurse),
        }
        Ok(FoldStep::Done(()))
    }

    fn combine(
        &mut self,
        _arena: &TypeArena<'a>,
        _ty: Ty<'a>,
        _children: impl ExactSizeIterator<Item = ()> + DoubleEndedIterator,
    ) -> Result<(), Infallible> {
        Ok(())
    }
}

impl<'a> TypeArena<'a> {
    /// Type variables reachable from `ty`, in first-seen order.
    pub fn free_type_vars(&self, ty: Ty<'a>) -> Vec<Ty<'a>> {
        let mut folder = FreeTypeVars::default();
        let Ok(()) = drive_fold(self, ty, &mut folder);
        folder.found
    }
}
