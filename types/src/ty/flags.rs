use bitflags::bitflags;

bitflags! {
    /// Flags indicating various properties of a type.
    ///
    /// These flags are computed once when a type is interned and cached
    /// for efficient queries. This avoids repeated recursive traversals.
    ///
    /// Nominal data types keep their flags in the declaration itself, since
    /// completing a stub or populating a variant can change them after the
    /// handle has been handed out.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct TyFlags: u16 {
        /// An unbound type variable is reachable from this type.
        const HAS_TYPE_VARS = 1;
        /// The type is wrapped in at least one qualifier or directive.
        const HAS_MODIFIERS = 1 << 1;
    }
}
