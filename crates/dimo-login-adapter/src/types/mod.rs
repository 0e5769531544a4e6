/*
[INPUT]:  Backend schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod enums;
pub mod responses;
pub mod settings;

pub use enums::*;
pub use responses::*;
pub use settings::*;
