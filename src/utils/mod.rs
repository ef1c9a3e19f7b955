//! Various unsorted geometrical and logical operators.

pub use self::center::center;
pub use self::cleanup::remove_unused_points;
pub use self::sorted_pair::SortedPair;

mod center;
mod cleanup;
pub mod hashmap;
mod sorted_pair;
