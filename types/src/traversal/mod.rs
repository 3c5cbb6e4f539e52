//! Stack-based traversal over interned types.

mod fold;

pub use fold::{Fold, FoldStep, drive_fold};
