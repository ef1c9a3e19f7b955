//! The hash-map used for edge and vertex bookkeeping.

pub use hashbrown::hash_map::Entry;

/// Hashmap using [`hashbrown::HashMap`] with its default hasher.
pub type HashMap<K, V> = hashbrown::HashMap<K, V>;
