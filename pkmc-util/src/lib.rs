pub mod packed_array;
pub mod read_ext;
pub mod varint;
pub mod vec3;

pub use packed_array::PackedArray;
pub use read_ext::ReadExt;
pub use varint::{read_varint, read_varint_ret_bytes, write_varint};
pub use vec3::Vec3;
