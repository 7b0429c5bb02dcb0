//! A fixed-length sequence stored as an ordered list of maximal same-value runs.
//!
//! The runs always tile `[0, len)` exactly and no two neighbours hold identical values, so the
//! memory footprint is proportional to the number of value transitions rather than to the length.
//! Structural edits (`insert`/`remove`) keep the length fixed: inserting pushes the tail out of
//! the window, removing replicates the last value into the freed tail.

pub use access::AccessPolicy;
pub use builder::RleSeqBuilder;
pub use identical::Identical;
pub use iter::{Direction, MatchingIndices, Values};
pub use rle_seq::RleSeq;
pub use run::Run;

mod access;
mod builder;
mod identical;
mod iter;
mod locate;
#[allow(clippy::module_inception)]
mod rle_seq;
mod run;
