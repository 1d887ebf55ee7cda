use thiserror::Error;

/// Failure decoding a `loadColumn` payload. Carries the byte offset the
/// decoder had reached, so a caller can report which section went wrong.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("truncated chunk payload at offset {offset}")]
    Truncated { offset: usize },
    #[error("unsupported bits-per-entry {bpe} at offset {offset}")]
    UnsupportedBpe { bpe: u8, offset: usize },
    #[error("palette index {index} out of range (palette has {palette_len} entries) at offset {offset}")]
    PaletteIndexOutOfRange {
        index: usize,
        palette_len: usize,
        offset: usize,
    },
    #[error("varint exceeded 5 bytes at offset {offset}")]
    VarintTooLong { offset: usize },
}

/// Failure writing a block state into the world.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    #[error("column ({cx}, {cz}) is not loaded")]
    NotLoaded { cx: i32, cz: i32 },
    #[error("y={y} is outside the world's vertical bounds")]
    OutOfRange { y: i32 },
}

/// Failure starting a raycast.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RaycastError {
    #[error("raycast direction is the zero vector")]
    ZeroDirection,
    #[error("maxDistance must be non-negative, got {0}")]
    NegativeMaxDistance(f64),
}
