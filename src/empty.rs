use crate::update::Update;

/// Can be used while indexing keys without values, like ``Llrb<K, Empty>``.
/// Merging two empty values is a no-op, so [`Llrb::update_or_insert`]
/// on such a tree simply makes sure the key is present.
///
/// [`Llrb::update_or_insert`]: crate::Llrb::update_or_insert
#[derive(Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub struct Empty {}

impl Update for Empty {
    #[inline]
    fn update(&mut self, _other: Empty) {}
}
