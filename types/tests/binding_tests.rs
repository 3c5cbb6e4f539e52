//! Binding generic declarations to concrete arguments.

use anvil_types::{
    BackendRepr, Binding, DataDecl, DataState, NoBackend, Qualifier, Ty, TypeArena, TypeError,
    ty,
};
use bumpalo::Bump;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

fn declare_pair<'a>(arena: &TypeArena<'a>) -> Ty<'a> {
    let a = arena.type_var("a");
    let b = arena.type_var("b");
    arena.define("Pair", DataDecl::new().generics([a, b]).members([a, b]))
}

/// `Maybe[t] = Some[t] | None`, with `Some[t] = (t)`.
fn declare_maybe<'a>(arena: &TypeArena<'a>) -> Ty<'a> {
    let t = arena.type_var("t");
    let some = arena.get_or_declare("Some");
    let none = arena.get_or_declare("None");
    let maybe = arena.define(
        "Maybe",
        DataDecl::new()
            .union()
            .generic(t)
            .members([some, none])
            .tag("Some", 0)
            .tag("None", 1),
    );
    arena.define("Some", DataDecl::new().generic(t).member(t).parent_union(maybe));
    arena.define("None", DataDecl::new().parent_union(maybe));
    maybe
}

// ============================================================================
// Pair[a, b]
// ============================================================================

#[test]
fn test_pair_binds_to_concrete_tuple() {
    init_logging();
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);

    let bindings = [
        Binding::new(arena.ident("a"), arena.i32()),
        Binding::new(arena.ident("b"), arena.bool()),
    ];
    let bound = arena.get_variant(pair, &bindings, &mut NoBackend).unwrap();
    let dt = bound.as_data().unwrap();

    assert_eq!(dt.state(), DataState::Variant);
    assert_eq!(dt.members(), &[arena.i32(), arena.bool()]);
    assert_eq!(dt.bound_generics(), &bindings);
    assert!(dt.generics().is_empty());
    assert!(!bound.is_generic());
    assert_eq!(bound.to_string(), "Pair<i32,bool>");
    assert_eq!(bound.matched_tys(), 3);

    assert_eq!(bound.root_declaration(), pair);
    assert!(dt.is_variant_of(pair));
    assert_eq!(pair.as_data().unwrap().variants(), vec![bound]);
}

#[test]
fn test_unrelated_bindings_are_ignored() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);

    let plain = [
        Binding::new(arena.ident("a"), arena.i32()),
        Binding::new(arena.ident("b"), arena.bool()),
    ];
    let noisy = [
        Binding::new(arena.ident("zz"), arena.f64()),
        Binding::new(arena.ident("a"), arena.i32()),
        Binding::new(arena.ident("b"), arena.bool()),
    ];
    assert_eq!(
        arena.get_variant(pair, &plain, &mut NoBackend).unwrap(),
        arena.get_variant(pair, &noisy, &mut NoBackend).unwrap()
    );
    assert_eq!(arena.stats().variants, 1);
}

#[test]
fn test_partial_binding_stays_generic() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);

    let partial = arena
        .get_variant(pair, &[Binding::new(arena.ident("a"), arena.i32())], &mut NoBackend)
        .unwrap();
    let dt = partial.as_data().unwrap();

    assert!(partial.is_generic());
    assert_eq!(dt.generics(), &[arena.type_var("b")]);
    assert_eq!(dt.members(), &[arena.i32(), arena.type_var("b")]);
    assert_eq!(dt.bound_name(), "Pair<i32,>");
}

#[test]
fn test_binding_a_variant_further_reaches_the_full_variant() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);
    let a = arena.ident("a");
    let b = arena.ident("b");

    let partial = arena
        .get_variant(pair, &[Binding::new(a, arena.i32())], &mut NoBackend)
        .unwrap();
    let through_partial = arena
        .get_variant(partial, &[Binding::new(b, arena.bool())], &mut NoBackend)
        .unwrap();
    let direct = arena
        .get_variant(
            pair,
            &[Binding::new(a, arena.i32()), Binding::new(b, arena.bool())],
            &mut NoBackend,
        )
        .unwrap();

    assert_eq!(through_partial, direct);
    assert_eq!(through_partial.root_declaration(), pair);
    assert_eq!(pair.as_data().unwrap().variants(), vec![partial, direct]);
}

#[test]
fn test_rebinding_a_bound_parameter_has_no_effect() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);
    let a = arena.ident("a");

    let partial = arena
        .get_variant(pair, &[Binding::new(a, arena.i32())], &mut NoBackend)
        .unwrap();
    // `a` is no longer a parameter of the variant.
    let again = arena
        .get_variant(partial, &[Binding::new(a, arena.u64())], &mut NoBackend)
        .unwrap();
    assert_eq!(again, partial);
}

#[test]
fn test_positional_and_named_binding_agree() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);

    let named = arena
        .bind_named(
            "Pair",
            &[
                Binding::new(arena.ident("b"), arena.c8()),
                Binding::new(arena.ident("a"), arena.u16()),
            ],
            &mut NoBackend,
        )
        .unwrap();
    let positional = arena
        .bind_positional(pair, &[arena.u16(), arena.c8()], &mut NoBackend)
        .unwrap();
    assert_eq!(named, positional);
}

#[test]
fn test_generic_argument_produces_generic_variant() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);

    let bound = arena
        .bind_positional(pair, &[ty!(arena, Ptr['x]), arena.i8()], &mut NoBackend)
        .unwrap();
    assert!(bound.is_generic());
    assert_eq!(bound.as_data().unwrap().generics(), &[arena.type_var("x")]);
    assert_eq!(
        bound.as_data().unwrap().dump().to_string(),
        "Pair['x]<a -> 'x*, b -> i8> = ('x*, i8)"
    );
}

// ============================================================================
// Substitution through structure
// ============================================================================

#[test]
fn test_substitute_reaches_nested_nominal_types() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let pair = declare_pair(&arena);

    let a = arena.type_var("a");
    let wrapper = arena.define(
        "Wrapper",
        DataDecl::new()
            .generic(a)
            .member(arena.pointer(pair))
            .member(arena.function(a, &[a], false)),
    );
    let bound = arena
        .bind_positional(wrapper, &[arena.f32()], &mut NoBackend)
        .unwrap();
    let members = bound.as_data().unwrap().members();

    let expected_pair = arena
        .get_variant(
            pair,
            &[Binding::new(arena.ident("a"), arena.f32())],
            &mut NoBackend,
        )
        .unwrap();
    assert_eq!(members[0], arena.pointer(expected_pair));
    assert_eq!(members[1], ty!(arena, fn(f32) -> f32));
}

#[test]
fn test_substitute_keeps_qualifiers() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    let cell = arena.define(
        "Cell",
        DataDecl::new().generic(ty!(arena, 't)).member(ty!(arena, mut 't)),
    );
    let bound = arena
        .bind_positional(cell, &[arena.u32()], &mut NoBackend)
        .unwrap();
    assert_eq!(bound.as_data().unwrap().members(), &[ty!(arena, mut u32)]);
}

#[test]
fn test_qualified_arguments_follow_qualifier_rules() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    let cell = arena.define(
        "Cell",
        DataDecl::new().generic(ty!(arena, 't)).member(ty!(arena, mut 't)),
    );
    let mut_cell = arena
        .bind_positional(cell, &[ty!(arena, mut u32)], &mut NoBackend)
        .unwrap();
    let const_cell = arena
        .bind_positional(cell, &[ty!(arena, const u32)], &mut NoBackend)
        .unwrap();

    // `mut` is not repeated and never overrides `const`.
    assert_eq!(mut_cell.as_data().unwrap().members(), &[ty!(arena, mut u32)]);
    assert_eq!(const_cell.as_data().unwrap().members(), &[ty!(arena, const u32)]);
    assert_eq!(
        const_cell.as_data().unwrap().members()[0],
        arena.add_modifier(ty!(arena, const u32), Qualifier::Mut)
    );

    let frozen = arena.define(
        "Frozen",
        DataDecl::new().generic(ty!(arena, 't)).member(ty!(arena, const 't)),
    );
    let bound = arena
        .bind_positional(frozen, &[ty!(arena, mut u32)], &mut NoBackend)
        .unwrap();
    assert_eq!(
        bound.as_data().unwrap().members(),
        &[arena.add_modifier(ty!(arena, mut u32), Qualifier::Const)]
    );
}

// ============================================================================
// Recursive declarations
// ============================================================================

#[test]
fn test_self_referential_declaration() {
    init_logging();
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    // `List[t] = (t, List*)`
    let t = arena.type_var("t");
    let list = arena.declare_generic("List", &[t]);
    let next = arena.pointer(list);
    assert!(next.is_generic());
    let list = arena.define("List", DataDecl::new().member(t).member(next));
    assert!(list.is_generic());

    let ints = arena
        .bind_positional(list, &[arena.i32()], &mut NoBackend)
        .unwrap();
    assert_eq!(
        ints.as_data().unwrap().members(),
        &[arena.i32(), arena.pointer(ints)]
    );
    assert!(!ints.is_generic());
    assert_eq!(ints.to_string(), "List<i32>");
    assert_eq!(list.as_data().unwrap().variants(), vec![ints]);
}

#[test]
fn test_mutually_recursive_declarations() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    // `Tree[t] = (t, Forest*)` and `Forest[t] = (Tree*, usz)`
    let t = arena.type_var("t");
    let tree = arena.declare_generic("Tree", &[t]);
    let forest = arena.declare_generic("Forest", &[t]);
    arena.define("Tree", DataDecl::new().member(t).member(arena.pointer(forest)));
    arena.define(
        "Forest",
        DataDecl::new().member(arena.pointer(tree)).member(arena.usz()),
    );
    assert!(tree.is_generic());
    assert!(forest.is_generic());

    let tree_u8 = arena
        .bind_positional(tree, &[arena.u8()], &mut NoBackend)
        .unwrap();
    let forest_u8 = arena
        .bind_named("Forest", &[Binding::new(arena.ident("t"), arena.u8())], &mut NoBackend)
        .unwrap();

    assert_eq!(
        tree_u8.as_data().unwrap().members(),
        &[arena.u8(), arena.pointer(forest_u8)]
    );
    assert_eq!(
        forest_u8.as_data().unwrap().members(),
        &[arena.pointer(tree_u8), arena.usz()]
    );
    assert!(!tree_u8.is_generic());
    assert!(!forest_u8.is_generic());
    assert_eq!(forest.as_data().unwrap().variants(), vec![forest_u8]);
}

// ============================================================================
// Tagged unions
// ============================================================================

#[test]
fn test_bound_alternative_links_to_bound_union() {
    init_logging();
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let maybe = declare_maybe(&arena);

    let some = arena.get_or_declare("Some");
    let some_f32 = arena
        .bind_positional(some, &[arena.f32()], &mut NoBackend)
        .unwrap();
    let maybe_f32 = arena
        .bind_positional(maybe, &[arena.f32()], &mut NoBackend)
        .unwrap();

    let alt = some_f32.as_data().unwrap();
    assert_eq!(alt.parent_union(), Some(maybe_f32));
    assert!(alt.is_union_tag());
    assert_eq!(alt.tag_value("None"), Ok(1));

    let union = maybe_f32.as_data().unwrap();
    assert!(union.is_union());
    assert_eq!(union.members(), &[some_f32, arena.get_or_declare("None")]);
    assert_eq!(union.tags(), maybe.as_data().unwrap().tags());
    assert_eq!(union.tag_value("Some"), Ok(0));
    assert_eq!(
        union.dump().to_string(),
        "Maybe<t -> f32> = Some<f32> | None"
    );
}

#[test]
fn test_unknown_tag_is_reported() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let maybe = declare_maybe(&arena);

    assert_eq!(
        maybe.as_data().unwrap().tag_value("Many"),
        Err(TypeError::UnknownTag {
            ty: "Maybe".into(),
            tag: "Many".into()
        })
    );
}

// ============================================================================
// Aliases and non-generic declarations
// ============================================================================

#[test]
fn test_alias_variant_resolves_to_member() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    let t = arena.type_var("t");
    let id = arena.define("Id", DataDecl::new().alias().generic(t).member(t));
    let meters = arena.define("Meters", DataDecl::new().alias().member(arena.f64()));
    let both = arena.define(
        "Both",
        DataDecl::new().alias().member(arena.i8()).member(arena.u8()),
    );

    let id_i32 = arena.bind_positional(id, &[arena.i32()], &mut NoBackend).unwrap();
    assert_eq!(id_i32.as_data().unwrap().aliased_type(&arena), arena.i32());
    assert_eq!(meters.as_data().unwrap().aliased_type(&arena), arena.f64());
    assert_eq!(both.as_data().unwrap().aliased_type(&arena), ty!(arena, (i8, u8)));
    assert_eq!(declare_pair(&arena).as_data().unwrap().aliased_type(&arena), arena.void());
}

#[test]
fn test_binding_non_generic_declaration() {
    init_logging();
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    let point = arena.define(
        "Point",
        DataDecl::new()
            .member(arena.f32())
            .member(arena.f32())
            .field("x")
            .field("y"),
    );
    let bound = arena
        .bind_named("Point", &[Binding::new(arena.ident("t"), arena.i32())], &mut NoBackend)
        .unwrap();

    // Nothing to substitute: a single variant with no bindings.
    assert_eq!(bound.root_declaration(), point);
    assert_eq!(bound.as_data().unwrap().members(), point.as_data().unwrap().members());
    assert_eq!(bound.as_data().unwrap().field_index("y"), Some(1));
    assert!(!bound.is_generic());
    assert_eq!(bound.to_string(), "Point");
}

#[test]
fn test_non_nominal_is_an_internal_fault() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);

    let err = arena
        .bind_positional(ty!(arena, (i32, i32)), &[arena.i32()], &mut NoBackend)
        .unwrap_err();
    assert_eq!(err, TypeError::NotNominal { ty: "(i32, i32)".into() });
    assert!(err.is_internal());
}

// ============================================================================
// Code generation hook
// ============================================================================

#[test]
fn test_hook_sees_every_new_variant_once() {
    let bump = Bump::new();
    let arena = TypeArena::new(&bump);
    let maybe = declare_maybe(&arena);

    let mut seen: Vec<(String, bool)> = Vec::new();
    let mut hook = |variant: Ty<'_>, is_generic: bool| {
        seen.push((variant.to_string(), is_generic));
        Some(BackendRepr(seen.len() as u64))
    };

    let first = arena
        .bind_positional(maybe, &[arena.i16()], &mut hook)
        .unwrap();
    let again = arena
        .bind_positional(maybe, &[arena.i16()], &mut hook)
        .unwrap();
    let open = arena
        .bind_positional(maybe, &[ty!(arena, 'u)], &mut hook)
        .unwrap();
    assert_eq!(first, again);
    assert!(open.is_generic());

    // The union registers itself before binding its alternatives, so the
    // alternative finishes first.
    assert_eq!(
        seen,
        vec![
            ("Some<i16>".to_string(), false),
            ("Maybe<i16>".to_string(), false),
            ("Some".to_string(), true),
            ("Maybe".to_string(), true),
        ]
    );
    assert_eq!(first.as_data().unwrap().backend(), Some(BackendRepr(2)));
}
