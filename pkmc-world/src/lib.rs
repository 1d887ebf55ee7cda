pub mod column;
pub mod error;
pub mod paletted_container;
pub mod parser;
pub mod profile;
pub mod raycast;
pub mod section;
pub mod world;

pub use column::{BlockInfo, Column};
pub use error::{ParseError, RaycastError, WriteError};
pub use profile::VersionProfile;
pub use raycast::{Face, Hit};
pub use world::World;
