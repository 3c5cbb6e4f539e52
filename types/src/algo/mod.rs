//! Algorithms over interned types, built on [`crate::traversal`].

mod free_vars;
mod substitute;
