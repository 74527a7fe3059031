use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    mem,
    ops::Deref,
};

use rand::Rng;

use crate::depth::Depth;
use crate::error::Error;
use crate::limit::Limit;
use crate::update::Update;

/// Llrb manage a single instance of in-memory sorted index using
/// [left-leaning-red-black][llrb] tree. Every node tracks the size of
/// its subtree, which lets the index answer rank queries, treating the
/// sorted keys as an array, in logarithmic time.
///
/// Llrb is a plain single threaded aggregate. Callers sharing it across
/// threads must synchronize externally.
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
#[derive(Clone)]
pub struct Llrb<K, V> {
    name: String,
    root: Option<Box<Node<K, V>>>,
    dups: bool, // whether the tree holds duplicate keys.
}

/// Different ways to construct a new Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Ord,
{
    /// Create an empty instance of Llrb, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Llrb<K, V>
    where
        S: AsRef<str>,
    {
        Llrb {
            name: name.as_ref().to_string(),
            root: Default::default(),
            dups: false,
        }
    }

    /// Create a new instance of Llrb tree and load it with entries
    /// from `iter`. Later entries replace earlier entries with the
    /// same key.
    pub fn load_from<S, I>(name: S, iter: I) -> Llrb<K, V>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut llrb = Llrb::new(name);
        for (key, value) in iter {
            llrb.replace_or_insert(key, value);
        }
        llrb
    }
}

/// Maintenance API.
impl<K, V> Llrb<K, V>
where
    K: Ord,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Llrb instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        size(self.root_deref())
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return quickly with basic statisics, only entries() method is valid
    /// with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<K, V>>())
    }

    /// Borrow the root node, for serializers walking the whole tree.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root_deref()
    }

    /// Move the entire tree out of this instance, leaving it empty.
    pub fn take_root(&mut self) -> Option<Box<Node<K, V>>> {
        self.dups = false;
        self.root.take()
    }

    /// Replace the entire tree with `root`, typically rehydrated by a
    /// deserializer using [`Node::build`]. The root is forced black, all
    /// other invariants are the caller's responsibility, use
    /// [`Llrb::validate`] to verify them. Duplicate keys are detected
    /// here, so a tree built with [`Llrb::insert_no_replace`] validates
    /// the same way under its new handle. Returns the previous tree.
    pub fn set_root(&mut self, root: Option<Box<Node<K, V>>>) -> Option<Box<Node<K, V>>> {
        let old = mem::replace(&mut self.root, root);
        if let Some(root) = self.root.as_mut() {
            root.set_black();
        }
        self.dups = self.iter().zip(self.iter().skip(1)).any(|(a, b)| a.0 == b.0);
        old
    }

    #[inline]
    fn root_deref(&self) -> Option<&Node<K, V>> {
        self.root.as_ref().map(Deref::deref)
    }

    fn put_root(&mut self, root: Option<Box<Node<K, V>>>) {
        self.root = root.map(|mut root| {
            root.set_black();
            root
        });
    }
}

type Upsert<K, V> = (Box<Node<K, V>>, Option<(K, V)>);

type Delete<K, V> = (Option<Box<Node<K, V>>>, Option<(K, V)>);

type Delmin<K, V> = (Option<Box<Node<K, V>>>, Option<Box<Node<K, V>>>);

/// Write operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Ord,
{
    /// Set value for key. If there is an existing entry for key,
    /// both key and value are replaced with the new ones and the old
    /// entry is returned.
    pub fn replace_or_insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let (root, old_entry) = Llrb::upsert(self.root.take(), key, value);
        self.put_root(Some(root));
        old_entry
    }

    /// Insert {key, value} without checking for an existing entry. Equal
    /// keys are routed to the right, so duplicates coexist and a later
    /// duplicate ranks after the earlier ones.
    pub fn insert_no_replace(&mut self, key: K, value: V) {
        let mut dup = false;
        let root = Llrb::insert(self.root.take(), key, value, &mut dup);
        self.put_root(Some(root));
        self.dups = self.dups || dup;
    }

    /// Delete key from this instance and return its entry. If key is
    /// not present, then delete is a no-op and the tree is left
    /// untouched.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.has(key) {
            return None;
        }
        let (root, old_entry) = Llrb::do_delete(self.root.take(), key);
        self.put_root(root);
        old_entry
    }

    /// Delete the entry with the smallest key.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        let (root, old_node) = Llrb::do_delete_min(self.root.take());
        self.put_root(root);
        old_node.map(Node::into_entry)
    }

    /// Delete the entry with the largest key.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        let (root, old_node) = Llrb::do_delete_max(self.root.take());
        self.put_root(root);
        old_node.map(Node::into_entry)
    }

    /// Validate LLRB tree with following rules:
    ///
    /// * Root is black, and no red link leans right.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    /// * Every node's size is one more than the size of its children.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>>
    where
        K: Clone,
    {
        let root = self.root_deref();
        if is_red(root) {
            return Err(Error::RedRoot);
        }
        let mut stats = self.stats();
        let (mut depths, mut prev) = (Depth::new(), None);
        let blacks = self.validate_tree(root, false, 0, 0, &mut prev, &mut depths)?;
        stats.set_blacks(blacks);
        stats.set_depths(depths);
        Ok(stats)
    }
}

/// Merge operations, for values that know how to absorb another value.
impl<K, V> Llrb<K, V>
where
    K: Ord,
    V: Update,
{
    /// Merge `value` into the entry for `key` using [`Update`], key is
    /// left as is. If key is not present, insert a new entry.
    pub fn update_or_insert(&mut self, key: K, value: V) {
        let root = Llrb::merge(self.root.take(), key, value);
        self.put_root(Some(root));
    }

    fn merge(node: Option<Box<Node<K, V>>>, key: K, value: V) -> Box<Node<K, V>> {
        let mut node = match node {
            None => return Node::new(key, value, false /*black*/),
            Some(node) => node,
        };

        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Some(Llrb::merge(node.left.take(), key, value));
            }
            Ordering::Greater => {
                node.right = Some(Llrb::merge(node.right.take(), key, value));
            }
            Ordering::Equal => node.value.update(value),
        }
        node.resize();
        Llrb::walkuprot_23(node)
    }
}

/// Read operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Ord,
{
    /// Get the entry for key.
    pub fn get<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root_deref();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return Some(nref.as_entry()),
            };
        }
        None
    }

    /// Check whether key is present.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Return the entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut node = self.root_deref()?;
        while let Some(left) = node.left_deref() {
            node = left;
        }
        Some(node.as_entry())
    }

    /// Return the entry with the largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut node = self.root_deref()?;
        while let Some(right) = node.right_deref() {
            node = right;
        }
        Some(node.as_entry())
    }

    /// Return the rank of key, as if the index were a sorted array.
    /// None if key is not present.
    ///
    /// ```
    /// use llrb_rank::Llrb;
    ///
    /// let mut llrb: Llrb<i64, ()> = Llrb::new("ranks");
    /// for key in [0, 2, 4].iter() {
    ///     llrb.replace_or_insert(*key, ());
    /// }
    /// assert_eq!(llrb.index_of(&2), Some(1));
    /// assert_eq!(llrb.index_of(&3), None);
    /// assert_eq!(llrb.index_of_less_or_equal(&3), Some(1));
    /// assert_eq!(llrb.index_of_greater_or_equal(&3), 2);
    /// ```
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.rank_walk(key) {
            (index, true) => Some(index),
            (_, false) => None,
        }
    }

    /// Return the rank of the largest key that is less than or equal
    /// to `key`. None if every key in the index is greater than `key`.
    pub fn index_of_less_or_equal<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.rank_walk(key) {
            (index, true) => Some(index),
            (index, false) => index.checked_sub(1),
        }
    }

    /// Return the rank of the smallest key that is greater than or
    /// equal to `key`. Return len() if every key is less than `key`.
    pub fn index_of_greater_or_equal<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rank_walk(key).0
    }

    /// Return the entry at `rank`, as if the index were a sorted array.
    /// This is the inverse of [`Llrb::index_of`].
    pub fn get_at(&self, mut rank: usize) -> Option<(&K, &V)> {
        let mut node = self.root_deref();
        while let Some(nref) = node {
            let lsize = size(nref.left_deref());
            node = match rank.cmp(&lsize) {
                Ordering::Less => nref.left_deref(),
                Ordering::Equal => return Some(nref.as_entry()),
                Ordering::Greater => {
                    rank -= lsize + 1;
                    nref.right_deref()
                }
            };
        }
        None
    }

    /// Return a random entry from this index, every entry is equally
    /// likely to be picked.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(&K, &V)> {
        match self.len() {
            0 => None,
            n => self.get_at(rng.gen_range(0, n)),
        }
    }

    /// Call `visit` for every entry whose key is greater than or equal
    /// to `low`, in ascending order. Iteration stops as soon as `visit`
    /// returns false. `visit` must not attempt to mutate this index.
    ///
    /// ```
    /// use llrb_rank::{Limit, Llrb};
    ///
    /// let llrb = Llrb::load_from("asc", vec![(4, 'a'), (6, 'b'), (1, 'c'), (3, 'd')]);
    /// let mut keys = vec![];
    /// llrb.ascend_greater_or_equal(Limit::Key(&2), |key, _| {
    ///     keys.push(*key);
    ///     true
    /// });
    /// assert_eq!(keys, vec![3, 4, 6]);
    ///
    /// // a plain key reference converts into a limit.
    /// let mut keys = vec![];
    /// llrb.ascend_greater_or_equal((&4).into(), |key, _| {
    ///     keys.push(*key);
    ///     true
    /// });
    /// assert_eq!(keys, vec![4, 6]);
    /// ```
    pub fn ascend_greater_or_equal<F>(&self, low: Limit<&K>, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        Llrb::ascend(self.root_deref(), &low, &mut visit);
    }

    /// Call `visit` for every entry whose key is less than or equal
    /// to `high`, in descending order. Iteration stops as soon as `visit`
    /// returns false. `visit` must not attempt to mutate this index.
    pub fn descend_less_or_equal<F>(&self, high: Limit<&K>, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        Llrb::descend(self.root_deref(), &high, &mut visit);
    }

    /// Return an iterator over all entries in this instance, in sort order.
    pub fn iter(&self) -> Iter<K, V> {
        let mut iter = Iter {
            stack: vec![],
            remaining: self.len(),
        };
        iter.push_left(self.root_deref());
        iter
    }
}

impl<K, V> Llrb<K, V>
where
    K: Ord,
{
    fn upsert(node: Option<Box<Node<K, V>>>, key: K, value: V) -> Upsert<K, V> {
        let mut node = match node {
            None => return (Node::new(key, value, false /*black*/), None),
            Some(node) => node,
        };

        let old_entry = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, o) = Llrb::upsert(node.left.take(), key, value);
                node.left = Some(left);
                o
            }
            Ordering::Greater => {
                let (right, o) = Llrb::upsert(node.right.take(), key, value);
                node.right = Some(right);
                o
            }
            Ordering::Equal => {
                let old_key = mem::replace(&mut node.key, key);
                let old_value = mem::replace(&mut node.value, value);
                Some((old_key, old_value))
            }
        };
        node.resize();
        (Llrb::walkuprot_23(node), old_entry)
    }

    fn insert(
        node: Option<Box<Node<K, V>>>,
        key: K,
        value: V,
        dup: &mut bool, // set when an equal key was passed on the way down
    ) -> Box<Node<K, V>> {
        let mut node = match node {
            None => return Node::new(key, value, false /*black*/),
            Some(node) => node,
        };

        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Some(Llrb::insert(node.left.take(), key, value, dup));
            }
            ord => {
                *dup = *dup || ord == Ordering::Equal;
                node.right = Some(Llrb::insert(node.right.take(), key, value, dup));
            }
        }
        node.resize();
        Llrb::walkuprot_23(node)
    }

    fn do_delete<Q>(node: Option<Box<Node<K, V>>>, key: &Q) -> Delete<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };

        let old_entry = if node.key.borrow().gt(key) {
            if node.left.is_none() {
                return (Some(node), None);
            }
            let left = node.left_deref();
            if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
                node = Llrb::move_red_left(node);
            }
            let (left, old_entry) = Llrb::do_delete(node.left.take(), key);
            node.left = left;
            old_entry
        } else {
            if is_red(node.left_deref()) {
                node = Llrb::rotate_right(node);
            }

            if !node.key.borrow().lt(key) && node.right.is_none() {
                return (None, Some(node.into_entry()));
            }

            let right = node.right_deref();
            if right.is_some() && !is_red(right) && !is_red(right.and_then(Node::left_deref)) {
                node = Llrb::move_red_right(node);
            }

            if !node.key.borrow().lt(key) {
                // node == key, swap in the in-order successor.
                let (right, succ) = Llrb::do_delete_min(node.right.take());
                node.right = right;
                let succ = match succ {
                    Some(succ) => *succ,
                    None => panic!("do_delete(): no successor, call the programmer"),
                };
                let old_key = mem::replace(&mut node.key, succ.key);
                let old_value = mem::replace(&mut node.value, succ.value);
                Some((old_key, old_value))
            } else {
                let (right, old_entry) = Llrb::do_delete(node.right.take(), key);
                node.right = right;
                old_entry
            }
        };
        node.resize();
        (Some(Llrb::fixup(node)), old_entry)
    }

    fn do_delete_min(node: Option<Box<Node<K, V>>>) -> Delmin<K, V> {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };
        // a node without left child can't have a right child in a
        // left leaning tree.
        if node.left.is_none() {
            return (None, Some(node));
        }
        let left = node.left_deref();
        if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
            node = Llrb::move_red_left(node);
        }
        let (left, old_node) = Llrb::do_delete_min(node.left.take());
        node.left = left;
        node.resize();
        (Some(Llrb::fixup(node)), old_node)
    }

    fn do_delete_max(node: Option<Box<Node<K, V>>>) -> Delmin<K, V> {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };
        if is_red(node.left_deref()) {
            node = Llrb::rotate_right(node);
        }
        if node.right.is_none() {
            return (None, Some(node));
        }
        let right = node.right_deref();
        if !is_red(right) && !is_red(right.and_then(Node::left_deref)) {
            node = Llrb::move_red_right(node);
        }
        let (right, old_node) = Llrb::do_delete_max(node.right.take());
        node.right = right;
        node.resize();
        (Some(Llrb::fixup(node)), old_node)
    }

    // accumulate 1 + size(left) on every right turn. Returns the
    // accumulated rank and whether an equal key was found.
    fn rank_walk<Q>(&self, key: &Q) -> (usize, bool)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut index, mut node) = (0, self.root_deref());
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Greater => nref.left_deref(),
                Ordering::Less => {
                    index += 1 + size(nref.left_deref());
                    nref.right_deref()
                }
                Ordering::Equal => return (index + size(nref.left_deref()), true),
            };
        }
        (index, false)
    }

    fn ascend<F>(node: Option<&Node<K, V>>, low: &Limit<&K>, visit: &mut F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        let node = match node {
            None => return true,
            Some(node) => node,
        };
        if low.cmp_key(&node.key) == Ordering::Greater {
            return Llrb::ascend(node.right_deref(), low, visit);
        }
        if !Llrb::ascend(node.left_deref(), low, visit) {
            return false;
        }
        if !visit(&node.key, &node.value) {
            return false;
        }
        Llrb::ascend(node.right_deref(), low, visit)
    }

    fn descend<F>(node: Option<&Node<K, V>>, high: &Limit<&K>, visit: &mut F) -> bool
    where
        F: FnMut(&K, &V) -> bool,
    {
        let node = match node {
            None => return true,
            Some(node) => node,
        };
        if high.cmp_key(&node.key) == Ordering::Less {
            return Llrb::descend(node.left_deref(), high, visit);
        }
        if !Llrb::descend(node.right_deref(), high, visit) {
            return false;
        }
        if !visit(&node.key, &node.value) {
            return false;
        }
        Llrb::descend(node.left_deref(), high, visit)
    }

    fn validate_tree<'a>(
        &self,
        node: Option<&'a Node<K, V>>,
        fromred: bool,
        mut nb: usize,
        depth: usize,
        prev: &mut Option<&'a K>, // previous key in sort order
        depths: &mut Depth,
    ) -> Result<usize, Error<K>>
    where
        K: Clone,
    {
        let node = match node {
            None => {
                depths.sample(depth);
                return Ok(nb);
            }
            Some(node) => node,
        };

        let red = !node.is_black();
        if fromred && red {
            return Err(Error::ConsecutiveReds);
        }
        if is_red(node.right_deref()) {
            return Err(Error::RedRightChild);
        }
        if !red {
            nb += 1;
        }

        let (left, right) = (node.left_deref(), node.right_deref());
        let lblacks = self.validate_tree(left, red, nb, depth + 1, prev, depths)?;
        if let Some(pkey) = prev.take() {
            let ok = if self.dups {
                pkey.le(&node.key)
            } else {
                pkey.lt(&node.key)
            };
            if !ok {
                return Err(Error::SortError(pkey.clone(), node.key.clone()));
            }
        }
        *prev = Some(&node.key);
        let rblacks = self.validate_tree(right, red, nb, depth + 1, prev, depths)?;
        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }

        let (lsize, rsize) = (size(left), size(right));
        if node.size != 1 + lsize + rsize {
            let err = format!("size: {} left: {} right: {}", node.size, lsize, rsize);
            return Err(Error::SizeMismatch(err));
        }
        Ok(lblacks)
    }

    //--------- rotation routines for 2-3 algorithm ----------------

    fn walkuprot_23(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right_deref()) && !is_red(node.left_deref()) {
            node = Llrb::rotate_left(node);
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            Llrb::flip(&mut node)
        }
        node
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    (r)                 (r)  \
    //            /       \                 /     \
    //          left       x             node      xr
    //                    / \            /  \
    //                  xl   xr       left   xl
    //
    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut x = match node.right.take() {
            Some(x) if !x.is_black() => x,
            _ => panic!("rotate_left(): rotating a black link ? Call the programmer"),
        };
        node.right = x.left.take();
        x.black = node.black;
        x.size = node.size;
        node.set_red();
        node.resize();
        x.left = Some(node);
        x
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //            (r)   \                   (r)  \
    //           /       \                 /      \
    //          x       right             xl      node
    //         / \                                / \
    //       xl   xr                             xr  right
    //
    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let mut x = match node.left.take() {
            Some(x) if !x.is_black() => x,
            _ => panic!("rotate_right(): rotating a black link ? Call the programmer"),
        };
        node.left = x.right.take();
        x.black = node.black;
        x.size = node.size;
        node.set_red();
        node.resize();
        x.right = Some(node);
        x
    }

    //        (x)                   (!x)
    //         |                     |
    //        node                  node
    //        / \                   / \
    //      (y) (z)              (!y) (!z)
    //     /      \              /      \
    //   left    right         left    right
    //
    fn flip(node: &mut Node<K, V>) {
        match (node.left.as_mut(), node.right.as_mut()) {
            (Some(left), Some(right)) => {
                left.toggle_link();
                right.toggle_link();
            }
            _ => panic!("flip(): missing child, call the programmer"),
        }
        node.toggle_link();
    }

    fn fixup(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right_deref()) {
            node = Llrb::rotate_left(node);
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            Llrb::flip(&mut node);
        }
        node
    }

    fn move_red_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Llrb::flip(&mut node);
        if is_red(node.right_deref().and_then(Node::left_deref)) {
            node.right = node.right.take().map(Llrb::rotate_right);
            node = Llrb::rotate_left(node);
            Llrb::flip(&mut node);
        }
        node
    }

    fn move_red_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Llrb::flip(&mut node);
        if is_red(node.left_deref().and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
            Llrb::flip(&mut node);
        }
        node
    }
}

impl<'a, K, V> IntoIterator for &'a Llrb<K, V>
where
    K: Ord,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool {
    node.map_or(false, |node| !node.is_black())
}

fn size<K, V>(node: Option<&Node<K, V>>) -> usize {
    node.map_or(0, |node| node.size)
}

/// Iterator over all entries of [`Llrb`] in sort order, created by
/// [`Llrb::iter`].
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.left_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Node corresponds to a single entry in Llrb instance.
#[derive(Clone)]
pub struct Node<K, V> {
    key: K,
    value: V,
    black: bool,                    // store: black or red
    size: usize,                    // store: number of nodes in this subtree
    left: Option<Box<Node<K, V>>>,  // store: left child
    right: Option<Box<Node<K, V>>>, // store: right child
}

// Primary operations on a single node.
impl<K, V> Node<K, V> {
    // CREATE operation
    fn new(key: K, value: V, black: bool) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            black,
            size: 1,
            left: None,
            right: None,
        })
    }

    /// Assemble a node from its parts, computing its subtree size from
    /// the children. Meant for deserializers rebuilding a tree that is
    /// handed over to [`Llrb::set_root`].
    pub fn build(
        key: K,
        value: V,
        black: bool,
        left: Option<Box<Node<K, V>>>,
        right: Option<Box<Node<K, V>>>,
    ) -> Box<Node<K, V>> {
        let mut node = Node::new(key, value, black);
        node.left = left;
        node.right = right;
        node.resize();
        node
    }

    /// Return key of this entry.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Return value of this entry.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Return number of entries in the subtree rooted at this node,
    /// including this node.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return whether the link from parent to this node is black.
    #[inline]
    pub fn is_black(&self) -> bool {
        self.black
    }

    /// Return the left subtree, keys ordered before this entry.
    #[inline]
    pub fn left(&self) -> Option<&Node<K, V>> {
        self.left_deref()
    }

    /// Return the right subtree, keys ordered after this entry.
    #[inline]
    pub fn right(&self) -> Option<&Node<K, V>> {
        self.right_deref()
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    fn as_entry(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    fn into_entry(self: Box<Self>) -> (K, V) {
        let node = *self;
        (node.key, node.value)
    }

    #[inline]
    fn resize(&mut self) {
        self.size = 1 + size(self.left_deref()) + size(self.right_deref())
    }

    #[inline]
    fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    fn toggle_link(&mut self) {
        self.black = !self.black
    }
}

/// Statistics on [`Llrb`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Llrb::stats`] method.
/// * To get full statisics via [`Llrb::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Llrb`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Llrb<k,V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use llrb_rank::Llrb;
    /// let llrb: Llrb<u64, u64> = Llrb::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 8 bytes
    /// // overhead is 32 bytes
    /// assert_eq!(llrb.stats().node_size(), 48);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black nodes from root to leaf, on both left
    /// and right child. Only available from [`Llrb::validate`].
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics. Only available from [`Llrb::validate`].
    pub fn depths(&self) -> Option<Depth> {
        self.depths.clone()
    }
}

#[cfg(test)]
mod balance_test {
    use super::{Llrb, Node};

    type Tree = Llrb<i64, i64>;

    #[test]
    #[should_panic(expected = "rotate_left(): rotating a black link")]
    fn test_rotate_left_black_link() {
        let right = Node::build(3, 30, true, None, None);
        let node = Node::build(2, 20, true, None, Some(right));
        Tree::rotate_left(node);
    }

    #[test]
    #[should_panic(expected = "rotate_right(): rotating a black link")]
    fn test_rotate_right_black_link() {
        let left = Node::build(1, 10, true, None, None);
        let node = Node::build(2, 20, true, Some(left), None);
        Tree::rotate_right(node);
    }

    #[test]
    #[should_panic(expected = "rotate_right(): rotating a black link")]
    fn test_rotate_right_missing_child() {
        Tree::rotate_right(Node::build(2, 20, true, None, None));
    }

    #[test]
    #[should_panic(expected = "flip(): missing child")]
    fn test_flip_missing_child() {
        let left = Node::build(1, 10, false, None, None);
        let mut node = Node::build(2, 20, true, Some(left), None);
        Tree::flip(&mut node);
    }

    #[test]
    fn test_rotate_keeps_sizes() {
        //     2            4
        //    / \         / \
        //   1  (4)  =>  (2)  5
        //      / \     / \
        //     3   5    1   3
        let left = Node::build(1, 10, true, None, None);
        let rl = Node::build(3, 30, true, None, None);
        let rr = Node::build(5, 50, true, None, None);
        let right = Node::build(4, 40, false, Some(rl), Some(rr));
        let node = Node::build(2, 20, true, Some(left), Some(right));

        let node = Tree::rotate_left(node);
        assert_eq!((node.key, node.size, node.black), (4, 5, true));
        let left = node.left().unwrap();
        assert_eq!((left.key, left.size, left.black), (2, 3, false));

        let node = Tree::rotate_right(node);
        assert_eq!((node.key, node.size, node.black), (2, 5, true));
        assert_eq!(node.right().map(|n| (n.key, n.size)), Some((4, 3)));
    }
}
