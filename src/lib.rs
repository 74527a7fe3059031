//! Left leaning red black tree, augmented with subtree sizes to answer
//! rank queries, along with bounded iteration in both directions.
//!
//! ```
//! use llrb_rank::{Limit, Llrb};
//!
//! let mut llrb: Llrb<i64, &str> = Llrb::new("leaderboard");
//! llrb.replace_or_insert(30, "carol");
//! llrb.replace_or_insert(10, "alice");
//! llrb.replace_or_insert(20, "bob");
//!
//! assert_eq!(llrb.index_of(&20), Some(1));
//! assert_eq!(llrb.get_at(2), Some((&30, &"carol")));
//!
//! let mut names = vec![];
//! llrb.descend_less_or_equal(Limit::PosInf, |_, name| {
//!     names.push(*name);
//!     true
//! });
//! assert_eq!(names, vec!["carol", "bob", "alice"]);
//! ```

mod depth;
mod empty;
mod error;
mod limit;
mod llrb;
mod update;

pub use crate::depth::Depth;
pub use crate::empty::Empty;
pub use crate::error::Error;
pub use crate::limit::Limit;
pub use crate::llrb::{Iter, Llrb, Node, Stats};
pub use crate::update::Update;
