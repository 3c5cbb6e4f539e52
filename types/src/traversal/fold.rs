//! Generic fold (catamorphism) for type traversal and transformation.
//!
//! The `Fold` trait drives a stack-based visitor that can:
//! - Rebuild types (`Output = Ty<'a>`), re-interning every changed node
//! - Collect information into the folder itself (`Output = ()`)
//!
//! Nominal types are leaves. Their members belong to the binding engine,
//! which decides when a nominal type is rebound.

use alloc::{vec, vec::Vec};

use crate::arena::TypeArena;
use crate::ty::Ty;

/// Control flow for the fold traversal.
pub enum FoldStep<'a, Output> {
    /// Continue into children, then combine results.
    Recurse,
    /// Finished with this node, prune children.
    Done(Output),
    /// Visit `ty` in place of the current node.
    Replace(Ty<'a>),
}

/// A fold over the structural children of a type.
pub trait Fold<'a> {
    type Output;
    type Error;

    /// Called before processing a type's children.
    fn visit(
        &mut self,
        arena: &TypeArena<'a>,
        ty: Ty<'a>,
    ) -> Result<FoldStep<'a, Self::Output>, Self::Error>;

    /// Called after all children have been processed.
    ///
    /// `children` holds the child results in the order given by
    /// [`TyKind::children`](crate::TyKind::children):
    /// - `Pointer`, `Array`, `Modifier`: `[inner]`
    /// - `Aggregate`: `[member0, member1, ...]`
    /// - `Function`: `[param0, param1, ..., ret]`
    fn combine(
        &mut self,
        arena: &TypeArena<'a>,
        ty: Ty<'a>,
        children: impl ExactSizeIterator<Item = Self::Output> + DoubleEndedIterator,
    ) -> Result<Self::Output, Self::Error>;
}

enum Task<'a> {
    Visit(Ty<'a>),
    Combine(usize, Ty<'a>),
}

/// Drive a fold over a type tree using stack-based iteration.
///
/// Children are visited left to right, so a collecting fold observes
/// nodes in pre-order.
pub fn drive_fold<'a, F>(arena: &TypeArena<'a>, root: Ty<'a>, folder: &mut F) -> Result<F::Output, F::Error>
where
    F: Fold<'a>,
{
    let mut stack = vec![Task::Visit(root)];
    let mut results: Vec<F::Output> = Vec::new();

    while let Some(task) = stack.pop() {
        match task {
            Task::Visit(ty) => match folder.visit(arena, ty)? {
                FoldStep::Done(out) => results.push(out),
                FoldStep::Replace(new_ty) => stack.push(Task::Visit(new_ty)),
                FoldStep::Recurse => {
                    let children = ty.kind().children();
                    stack.push(Task::Combine(children.len(), ty));
                    stack.extend(children.into_iter().rev().map(Task::Visit));
                }
            },
            Task::Combine(count, ty) => {
                let start = results
                    .len()
                    .checked_sub(count)
                    .expect("Bug: result stack underflow");
                let children = results.drain(start..);
                let out = folder.combine(arena, ty, children)?;
                results.push(out);
            }
        }
    }

    debug_assert_eq!(
        results.len(),
        1,
        "Algorithm bug: expected exactly one result"
    );
    Ok(results.pop().expect("empty result stack"))
}
