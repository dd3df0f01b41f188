pub mod codec;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod generate;
pub mod input;
pub mod logging;
pub mod permutation;
pub mod report;

pub use codec::{decode, encode};
pub use config::{layer_depth, RunConfig};
pub use engine::{encode_chain, invert, invert_with, Inversion, InvertError, RoundingPolicy};
pub use error::Error;
pub use permutation::{rank_to_permutation, Permutation};
pub use report::Report;
