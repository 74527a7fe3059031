use std::cmp::Ordering;

/// Limit is the starting point for bounded iteration. Along with real
/// keys it can express the two infinities, so that a caller can ask for
/// "from the very first key" or "down to the very last key" without
/// special casing. Infinities are never stored in the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Limit<T> {
    /// Orders before every key.
    NegInf,
    /// Orders as the wrapped key.
    Key(T),
    /// Orders after every key.
    PosInf,
}

impl<'a, K> Limit<&'a K>
where
    K: Ord,
{
    /// Compare this limit with `key`, infinities win over any key.
    pub(crate) fn cmp_key(&self, key: &K) -> Ordering {
        match self {
            Limit::NegInf => Ordering::Less,
            Limit::Key(limit) => (*limit).cmp(key),
            Limit::PosInf => Ordering::Greater,
        }
    }
}

impl<T> From<T> for Limit<T> {
    fn from(key: T) -> Limit<T> {
        Limit::Key(key)
    }
}
