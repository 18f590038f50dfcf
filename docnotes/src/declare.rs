use crate::subject::MemberKind;

/// Receives declaration events, in declaration order.
///
/// Implemented by [`DocScope`](crate::DocScope) for scopes resolved through a
/// [`MemberTable`](crate::MemberTable). Anything that produces declarations (a
/// builder, a macro, a plugin) reports them through this trait.
pub trait Declarer {
    /// A callable called `name` just became part of the scope.
    fn declare_member(&mut self, name: &str, kind: MemberKind);

    /// A constant called `name` just became part of the scope.
    fn declare_constant(&mut self, name: &str);
}

/// Types that can report their own members to a [`Declarer`].
///
/// Usually implemented through the [`members`](crate::members) attribute.
pub trait Members {
    /// The name of the declaring scope.
    const SCOPE_NAME: &'static str;

    /// Reports every member, in source order.
    fn declare_members<D: Declarer + ?Sized>(declarer: &mut D);
}
