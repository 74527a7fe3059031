use std::{error, fmt};

/// Error enumerates over all structural faults that [`Llrb::validate`]
/// can detect. None of these are expected from a correctly used tree,
/// they either point to a bug in the balancing code or to a root that
/// was rehydrated from a broken snapshot via [`Llrb::set_root`].
///
/// [`Llrb::validate`]: crate::Llrb::validate
/// [`Llrb::set_root`]: crate::Llrb::set_root
#[derive(Debug, PartialEq)]
pub enum Error<K> {
    /// Fatal case, two red links in a row on the path from root.
    ConsecutiveReds,
    /// Fatal case, a right child is red, tree is not left leaning.
    RedRightChild,
    /// Fatal case, root is red after a public call returned.
    RedRoot,
    /// Fatal case, black height differs between left and right subtree.
    /// The String component of this variant can be used for debugging.
    UnbalancedBlacks(String),
    /// Fatal case, index entries are not in sort-order.
    SortError(K, K),
    /// Fatal case, a node's size does not match its descendant count.
    SizeMismatch(String),
}

impl<K> fmt::Display for Error<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ConsecutiveReds => write!(f, "consecutive red links"),
            Error::RedRightChild => write!(f, "red link leaning right"),
            Error::RedRoot => write!(f, "root is red"),
            Error::UnbalancedBlacks(msg) => write!(f, "unbalanced blacks, {}", msg),
            Error::SortError(a, b) => write!(f, "keys out of order {:?} {:?}", a, b),
            Error::SizeMismatch(msg) => write!(f, "size mismatch, {}", msg),
        }
    }
}

impl<K> error::Error for Error<K> where K: fmt::Debug {}
