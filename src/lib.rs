// lib.rs

/// Contains the interface between `Mesh` objects and STL streams or files.
pub mod io;

/// Contains the text number format and binary layout shared by the encoder and the decoder.
pub(crate) mod shared;

/// Defines the ASCII and binary STL writers.
pub mod encode;

/// Defines the encoding detector and the ASCII and binary STL parsers.
pub mod decode;

/// Contains the triangle model, the encoding tag and the byte coder.
pub mod core;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::mesh::{Mesh, Triangle, Vec3};
    pub use crate::core::shared::{ConfigType, Encoding};
    pub use crate::core::bit_coder::{Order, ReaderErr};
    pub use crate::decode::{self, decode, detect};
    pub use crate::encode::{self, encode};
    pub use crate::io::{convert, Conversion};
}

pub use crate::core::mesh::Mesh;
