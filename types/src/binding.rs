//! Monomorphization of generic nominal types.
//!
//! [`TypeArena::get_variant`] is the single entry point. It resolves the
//! requested bindings against the declaration's own parameters, looks up
//! the root declaration's variant table, and only builds a new variant on
//! a miss. A new variant is registered before its members are bound, so a
//! declaration that refers to itself finds the variant under construction
//! instead of recursing forever.

use alloc::string::ToString;

use smallvec::SmallVec;

use crate::arena::TypeArena;
use crate::data::{BackendRepr, DataDef, DataState, DataType};
use crate::error::TypeError;
use crate::ty::{Binding, Ty, TyFlags, TyKind};

pub(crate) type Bindings<'a> = SmallVec<[Binding<'a>; 4]>;

/// Code-generation collaborator notified once per new variant.
///
/// The returned representation is stored in the variant and never
/// interpreted by the type layer.
pub trait VariantHook<'a> {
    fn variant_bound(&mut self, variant: Ty<'a>, is_generic: bool) -> Option<BackendRepr>;
}

/// Hook for callers without a backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBackend;

impl<'a> VariantHook<'a> for NoBackend {
    fn variant_bound(&mut self, _variant: Ty<'a>, _is_generic: bool) -> Option<BackendRepr> {
        None
    }
}

impl<'a, F> VariantHook<'a> for F
where
    F: FnMut(Ty<'a>, bool) -> Option<BackendRepr>,
{
    fn variant_bound(&mut self, variant: Ty<'a>, is_generic: bool) -> Option<BackendRepr> {
        self(variant, is_generic)
    }
}

/// Keeps the bindings whose name is one of `generics`, in binding order.
pub(crate) fn filter_matching<'a>(generics: &[Ty<'a>], bindings: &[Binding<'a>]) -> Bindings<'a> {
    bindings
        .iter()
        .filter(|b| {
            generics
                .iter()
                .any(|g| matches!(g.kind(), TyKind::TypeVar(name) if *name == b.name))
        })
        .copied()
        .collect()
}

fn is_any_generic<'a>(tys: impl IntoIterator<Item = Ty<'a>>) -> bool {
    tys.into_iter().any(|ty| ty.is_generic())
}

impl<'a> TypeArena<'a> {
    /// Returns the variant of `unbound` for `bindings`, creating it on first
    /// request.
    ///
    /// Bindings for names that are not parameters of `unbound` are ignored.
    /// `unbound` may itself be a variant, in which case the result is bound
    /// from the root declaration.
    pub fn get_variant(
        &self,
        unbound: Ty<'a>,
        bindings: &[Binding<'a>],
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        let unbound = unbound.strip_modifiers();
        let Some(dt) = unbound.as_data() else {
            tracing::error!(ty = %unbound, "cannot bind a type that is not nominal");
            return Err(TypeError::NotNominal {
                ty: unbound.to_string(),
            });
        };
        if dt.is_stub() {
            tracing::warn!(ty = %dt.name(), "cannot bind undeclared type");
            return Ok(unbound);
        }

        let filtered = filter_matching(dt.generics(), bindings);
        let flattened = self.flatten(dt, &filtered, hook)?;
        let root = unbound.root_declaration();
        let root_dt = root.as_data().unwrap_or(dt);

        if let Some(existing) = self.lookup_variant(root, &flattened) {
            return Ok(existing);
        }

        let variant = self.alloc_variant(root, root_dt, &flattened);
        self.bind_variant(root, root_dt, variant, hook)?;
        Ok(variant)
    }

    /// Binds the declaration named `name`.
    ///
    /// Binding a name that was never defined warns and returns its stub.
    pub fn bind_named(
        &self,
        name: &str,
        bindings: &[Binding<'a>],
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        let ty = self.get_or_declare(name);
        self.get_variant(ty, bindings, hook)
    }

    /// Binds `ty` by zipping `args` with its open generic parameters.
    pub fn bind_positional(
        &self,
        ty: Ty<'a>,
        args: &[Ty<'a>],
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Ty<'a>, TypeError> {
        let ty = ty.strip_modifiers();
        let Some(dt) = ty.as_data() else {
            tracing::error!(%ty, "type arguments applied to a type that is not nominal");
            return Err(TypeError::NotNominal { ty: ty.to_string() });
        };
        if dt.is_stub() {
            tracing::warn!(ty = %dt.name(), "cannot bind undeclared type");
            return Ok(ty);
        }

        let generics = dt.generics();
        if generics.len() != args.len() {
            tracing::warn!(
                ty = %dt.name(),
                expected = generics.len(),
                found = args.len(),
                "wrong number of type arguments"
            );
            return Err(TypeError::ArityMismatch {
                ty: dt.name().as_str().to_string(),
                expected: generics.len(),
                found: args.len(),
            });
        }

        let bindings: Bindings<'a> = generics
            .iter()
            .zip(args)
            .filter_map(|(param, arg)| match param.kind() {
                TyKind::TypeVar(name) => Some(Binding::new(*name, *arg)),
                _ => None,
            })
            .collect();
        self.get_variant(ty, &bindings, hook)
    }

    /// Resolves every parameter of the root declaration, first through the
    /// bindings `dt` already carries (when `dt` is a variant), then through
    /// `bindings`. Parameters left open map to themselves.
    fn flatten(
        &self,
        dt: &DataType<'a>,
        bindings: &[Binding<'a>],
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<Bindings<'a>, TypeError> {
        let (params, prior) = match dt.unbound_type().and_then(|root| root.as_data()) {
            Some(root) => (root.generics(), dt.bound_generics()),
            None => (dt.generics(), &[][..]),
        };

        let mut flattened = Bindings::with_capacity(params.len());
        for param in params {
            let TyKind::TypeVar(name) = param.kind() else {
                continue;
            };
            let mut ty = *param;
            if !prior.is_empty() {
                ty = self.substitute(ty, prior, hook)?;
            }
            ty = self.substitute(ty, bindings, hook)?;
            flattened.push(Binding::new(*name, ty));
        }
        Ok(flattened)
    }

    /// Allocates an unpopulated variant and registers it with the variant
    /// table and the root's variant list.
    fn alloc_variant(
        &self,
        root: Ty<'a>,
        root_dt: &DataType<'a>,
        bindings: &[Binding<'a>],
    ) -> Ty<'a> {
        let bound = self.alloc_slice(bindings);
        let mut generics: SmallVec<[Ty<'a>; 4]> = SmallVec::new();
        for binding in bound {
            for tv in self.free_type_vars(binding.ty) {
                if !generics.contains(&tv) {
                    generics.push(tv);
                }
            }
        }

        let def = DataDef {
            state: DataState::Variant,
            is_union: root_dt.is_union(),
            generics: self.alloc_slice(&generics),
            bound_generics: bound,
            unbound: Some(root),
            ..DataDef::STUB
        };
        let variant = self.alloc_node(TyKind::Data(DataType::new(
            self.bump(),
            root_dt.name(),
            def,
        )));
        if let Some(dt) = variant.as_data() {
            if is_any_generic(bound.iter().map(|b| b.ty)) {
                dt.set_flags(TyFlags::HAS_TYPE_VARS);
            }
            dt.set_matched(bound.len() as u32 + 1);
        }

        self.insert_variant(root, bound, variant);
        root_dt.push_variant(variant);
        tracing::debug!(%variant, "created variant");
        variant
    }

    /// Populates a freshly allocated variant from its root declaration.
    fn bind_variant(
        &self,
        root: Ty<'a>,
        root_dt: &DataType<'a>,
        variant: Ty<'a>,
        hook: &mut dyn VariantHook<'a>,
    ) -> Result<(), TypeError> {
        let Some(var_dt) = variant.as_data() else {
            return Ok(());
        };
        if root_dt.generics().is_empty() {
            tracing::warn!(ty = %root, "binding a declaration with no generic parameters");
        }

        let bindings = var_dt.bound_generics();
        let mut members: SmallVec<[Ty<'a>; 8]> = SmallVec::with_capacity(root_dt.members().len());
        for member in root_dt.members() {
            members.push(self.substitute(*member, bindings, hook)?);
        }

        let parent_union = match root_dt.parent_union() {
            Some(union) => Some(self.substitute(union, bindings, hook)?),
            None => None,
        };

        let is_generic = if members.is_empty() {
            is_any_generic(bindings.iter().map(|b| b.ty))
        } else {
            is_any_generic(members.iter().copied())
        };

        let root_def = root_dt.def();
        var_dt.set_def(DataDef {
            is_alias: root_def.is_alias,
            members: self.alloc_slice(&members),
            fields: root_def.fields,
            tags: root_def.tags,
            parent_union,
            trait_impls: root_def.trait_impls,
            ..var_dt.def()
        });
        var_dt.set_flags(if is_generic {
            TyFlags::HAS_TYPE_VARS
        } else {
            TyFlags::empty()
        });

        if let Some(repr) = hook.variant_bound(variant, is_generic) {
            var_dt.attach_backend(repr);
        }
        Ok(())
    }
}
