//! Key equivalence predicates.

/// Decides whether two keys are the same entry.
///
/// Must agree with the map's `KeyHasher`: keys that compare equivalent
/// must hash to the same code.
pub trait KeyEquivalence<Q: ?Sized> {
    fn equivalent(&self, a: &Q, b: &Q) -> bool;
}

impl<Q, F> KeyEquivalence<Q> for F
where
    Q: ?Sized,
    F: Fn(&Q, &Q) -> bool,
{
    #[inline]
    fn equivalent(&self, a: &Q, b: &Q) -> bool {
        self(a, b)
    }
}

/// Equivalence via `PartialEq`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DefaultEq;

impl<Q> KeyEquivalence<Q> for DefaultEq
where
    Q: ?Sized + PartialEq,
{
    #[inline]
    fn equivalent(&self, a: &Q, b: &Q) -> bool {
        a == b
    }
}
