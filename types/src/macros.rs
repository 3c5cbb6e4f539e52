//! Type construction macro for tests and examples.
//!
//! # Example
//!
//! ```
//! use anvil_types::{ty, TypeArena};
//! use bumpalo::Bump;
//!
//! let bump = Bump::new();
//! let arena = TypeArena::new(&bump);
//!
//! let int_ty = ty!(arena, i32);
//! let slice = ty!(arena, [u8]);
//! let func = ty!(arena, fn(Ptr[c8], usz) -> mut 't);
//!
//! assert_eq!(slice, arena.array(arena.u8(), 0));
//! assert_eq!(func.function_params().unwrap()[1], arena.usz());
//! assert_eq!(int_ty, ty!(arena, i32));
//! ```

/// Builds an interned type from a compact syntax.
///
/// # Syntax
///
/// | Pattern | Meaning |
/// |---------|---------|
/// | `i32`, `bool`, `void`, ... | Primitive types |
/// | `'t` | Type variable `t` |
/// | `Ptr[T]` | Pointer |
/// | `[T; N]`, `[T]` | Array, unsized array |
/// | `(A, B)` | Tuple |
/// | `fn(A, B) -> R`, `meta fn(A) -> R` | Function types |
/// | `mut T`, `const T` | Qualified type |
/// | `{expr}` | An existing `Ty` handle |
#[macro_export]
macro_rules! ty {
    // === Entry point ===

    ($b:expr, $($rest:tt)+) => {{
        let __b = &$b;
        $crate::ty!(@ty __b ; $($rest)+)
    }};

    // === Qualifiers ===

    (@ty $b:expr ; mut $($inner:tt)+) => {
        $b.add_modifier($crate::ty!(@ty $b ; $($inner)+), $crate::Qualifier::Mut)
    };
    (@ty $b:expr ; const $($inner:tt)+) => {
        $b.add_modifier($crate::ty!(@ty $b ; $($inner)+), $crate::Qualifier::Const)
    };

    // === Functions ===

    (@ty $b:expr ; fn($($params:tt)*) -> $($ret:tt)+) => {
        $b.function(
            $crate::ty!(@ty $b ; $($ret)+),
            &$crate::ty!(@list $b ; [] [] $($params)*),
            false,
        )
    };
    (@ty $b:expr ; meta fn($($params:tt)*) -> $($ret:tt)+) => {
        $b.function(
            $crate::ty!(@ty $b ; $($ret)+),
            &$crate::ty!(@list $b ; [] [] $($params)*),
            true,
        )
    };

    // === Ptr[T] ===

    (@ty $b:expr ; Ptr[$($inner:tt)+]) => {
        $b.pointer($crate::ty!(@ty $b ; $($inner)+))
    };

    // === [T; N] and [T] ===

    (@ty $b:expr ; [$($inner:tt)+]) => {
        $crate::ty!(@array $b ; [] $($inner)+)
    };

    // === (A, B, ...) ===

    (@ty $b:expr ; ($($inner:tt)*)) => {
        $b.tuple(&$crate::ty!(@list $b ; [] [] $($inner)*))
    };

    // === Leaves ===

    (@ty $b:expr ; {$e:expr}) => {
        $e
    };
    (@ty $b:expr ; $var:lifetime) => {
        $b.type_var(&stringify!($var)[1..])
    };
    (@ty $b:expr ; $prim:ident) => {
        $b.$prim()
    };

    // === Array parsing: accumulate element tokens until `; N` ===

    (@array $b:expr ; [$($elem:tt)+] ; $len:literal) => {
        $b.array($crate::ty!(@ty $b ; $($elem)+), $len)
    };
    (@array $b:expr ; [$($elem:tt)+]) => {
        $b.array($crate::ty!(@ty $b ; $($elem)+), 0)
    };
    (@array $b:expr ; [$($elem:tt)*] $tok:tt $($rest:tt)*) => {
        $crate::ty!(@array $b ; [$($elem)* $tok] $($rest)*)
    };

    // === Comma-separated lists ===
    // @list builder ; [finished types] [current accumulator] remaining_tokens
    // Bracketed groups are single token trees, so nested commas stay hidden.

    (@list $b:expr ; [$($done:expr),*] []) => {
        [$($done),*]
    };
    (@list $b:expr ; [$($done:expr),*] [$($acc:tt)+]) => {
        [$($done,)* $crate::ty!(@ty $b ; $($acc)+)]
    };
    (@list $b:expr ; [$($done:expr),*] [$($acc:tt)+] , $($rest:tt)*) => {
        $crate::ty!(@list $b ; [$($done,)* $crate::ty!(@ty $b ; $($acc)+)] [] $($rest)*)
    };
    (@list $b:expr ; [$($done:expr),*] [$($acc:tt)*] $tok:tt $($rest:tt)*) => {
        $crate::ty!(@list $b ; [$($done),*] [$($acc)* $tok] $($rest)*)
    };
}
