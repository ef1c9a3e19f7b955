//! Reading and writing clumps in the `x,y,z,r` text format.
//!
//! Each line of a clump file describes one sphere: the three coordinates of
//! its center followed by its radius, separated by commas. Spheres appear in
//! the order they were generated.

pub use self::clump_text::{
    load_clump, parse_clump_text, read_clump_text, save_clump, to_clump_text, write_clump_text,
};

mod clump_text;
