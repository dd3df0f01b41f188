use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvertError {
    #[error("layer {layer}: intermediate {value} is not representable as an i64 rank")]
    NonRepresentable { layer: u32, value: f64 },

    #[error("layer {layer}: input {value} lies outside the exact f64 integer range")]
    Inexact { layer: u32, value: i64 },

    #[error("layer {layer}: encoding {rank} leaves the exact f64 integer range")]
    Overflow { layer: u32, rank: i64 },
}
