pub use error::{Error, Result};
pub use rle_seq::{
    AccessPolicy, Direction, Identical, MatchingIndices, RleSeq, RleSeqBuilder, Run, Values,
};

mod error;
pub mod rle_seq;
