/// Update merges a value into an existing value of the same type, in
/// place. Used by [`Llrb::update_or_insert`] when the key being inserted
/// is already present in the tree.
///
/// ```
/// use llrb_rank::Llrb;
///
/// let mut scores: Llrb<&str, u64> = Llrb::new("scores");
/// scores.update_or_insert("alice", 10);
/// scores.update_or_insert("alice", 5);
/// assert_eq!(scores.get("alice"), Some((&"alice", &15)));
/// assert_eq!(scores.len(), 1);
/// ```
///
/// [`Llrb::update_or_insert`]: crate::Llrb::update_or_insert
pub trait Update {
    /// Absorb `other` into `self`, `self` holds the merged value.
    fn update(&mut self, other: Self);
}

macro_rules! impl_update_add {
    ($($t:ty),*) => {
        $(
            impl Update for $t {
                #[inline]
                fn update(&mut self, other: $t) {
                    *self += other
                }
            }
        )*
    };
}

impl_update_add!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Update for String {
    #[inline]
    fn update(&mut self, other: String) {
        self.push_str(&other)
    }
}

impl<T> Update for Vec<T> {
    #[inline]
    fn update(&mut self, mut other: Vec<T>) {
        self.append(&mut other)
    }
}
