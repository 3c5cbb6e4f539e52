// Helper macro to distinguish between patterns and expressions
#[macro_export]
macro_rules! assert_case {
    // Guard patterns - patterns with if conditions
    ($result:expr, { $pattern:pat if $guard:expr }) => {
        match $result {
            $pattern if $guard => {},
            other => panic!("Expected {} if {} but got {:?}", stringify!($pattern), stringify!($guard), other),
        }
    };

    // Pattern matching cases - detect common pattern forms
    ($result:expr, { Ok($($pattern:tt)*) }) => {
        match $result {
            Ok($($pattern)*) => {},
            other => panic!("Expected Ok({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { Err($($pattern:tt)*) }) => {
        match $result {
            Err($($pattern)*) => {},
            other => panic!("Expected Err({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { Some($($pattern:tt)*) }) => {
        match $result {
            Some($($pattern)*) => {},
            other => panic!("Expected Some({}) but got {:#?}", stringify!($($pattern)*), other),
        }
    };

    ($result:expr, { None }) => {
        match $result {
            None => {},
            other => panic!("Expected None but got {:#?}", other),
        }
    };

    // Wildcard pattern
    ($result:expr, { _ }) => {
        // Always passes - just to ensure the expression compiles
        let _ = $result;
    };

    // Default case - treat as expression for equality comparison
    ($result:expr, { $expected:expr }) => {
        match $result {
            Ok(actual) => {
                pretty_assertions::assert_eq!($expected, actual, "Expected {:#?} but got {:#?}\n\n< expected / got >", $expected, actual);
            },
            other => panic!("Expected Ok(...) but got {:?}", other),
        }
    };
}

// Helper macro to generate test functions based on field names
#[macro_export]
macro_rules! handle_case {
    ([$($attrs:meta)*] printed, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_printed() {
            let bump = bumpalo::Bump::new();
            let arena = anvil::TypeArena::new(&bump);
            let result = lower(&arena).map(|ty| ty.to_string());
            assert_case!(result.as_deref(), $expected);
        }
    };

    ([$($attrs:meta)*] generic, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_generic() {
            let bump = bumpalo::Bump::new();
            let arena = anvil::TypeArena::new(&bump);
            let result = lower(&arena).map(|ty| ty.is_generic());
            assert_case!(result, $expected);
        }
    };

    ([$($attrs:meta)*] dump, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_dump() {
            let bump = bumpalo::Bump::new();
            let arena = anvil::TypeArena::new(&bump);
            let result = lower(&arena)
                .map(|ty| ty.as_data().map(|dt| dt.dump().to_string()).unwrap_or_default());
            assert_case!(result.as_deref(), $expected);
        }
    };

    ([$($attrs:meta)*] canonical, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_canonical() {
            let bump = bumpalo::Bump::new();
            let arena = anvil::TypeArena::new(&bump);
            // Lowering the same syntax again must land on the same node.
            let result = lower(&arena).and_then(|first| {
                let second = arena.lower(&input(), &mut anvil::NoBackend)?;
                Ok(first == second)
            });
            assert_case!(result, $expected);
        }
    };

    ([$($attrs:meta)*] error, $expected:tt) => {
        $(#[$attrs])*
        #[test]
        fn validate_error() {
            let bump = bumpalo::Bump::new();
            let arena = anvil::TypeArena::new(&bump);
            let result = lower(&arena).map(|ty| ty.to_string());
            assert_case!(result, $expected);
        }
    };

    // Generic case for unknown field names
    ([$($attrs:meta)*] $field_name:ident, $expected:tt) => {
        compile_error!(concat!("Unknown test case field: ", stringify!($field_name)));
    };
}

// Helper macro to recursively parse assertion fields (now correctly capturing braces)
#[macro_export]
macro_rules! parse_assertions {
    // Base case: no more fields to parse
    (@parse [$($test_functions:tt)*]) => {
        $($test_functions)*
    };

    // Parse assertion field with potential attributes (handles both cases)
    (@parse [$($test_functions:tt)*] $(#[$attr:meta])* $field_name:ident: $field_value:tt, $($rest:tt)*) => {
        parse_assertions! {@parse [
            $($test_functions)*
            handle_case! {[$($attr)*] $field_name, $field_value}
        ] $($rest)*}
    };
}

// Main macro - name first, optional setup, input, then any order for assertions
#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        $($assertion_fields:tt)*
    ) => {
        test_case! {
            name: $name,
            setup: |_arena| {},
            input: $input,
            $($assertion_fields)*
        }
    };

    (
        name: $name:ident,
        setup: $setup:expr,
        input: $input:expr,
        $($assertion_fields:tt)*
    ) => {
        mod $name {
            #![allow(unused_imports, dead_code)]

            use super::*;

            fn input() -> anvil::TypeSyntax {
                $input
            }

            // Declarations the input refers to, run on a fresh arena.
            fn setup(arena: &anvil::TypeArena<'_>) {
                let declare: fn(&anvil::TypeArena<'_>) = $setup;
                declare(arena);
            }

            fn lower<'a>(arena: &anvil::TypeArena<'a>) -> Result<anvil::Ty<'a>, anvil::TypeError> {
                setup(arena);
                arena.lower(&input(), &mut anvil::NoBackend)
            }

            // Generate all test functions
            parse_assertions! {@parse [] $($assertion_fields)*}
        }
    };
}
