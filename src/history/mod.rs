//! Head-to-head history between pairs of teams

pub mod pairwise;

pub use pairwise::{PairKey, PairRecord, PairwiseHistory};
