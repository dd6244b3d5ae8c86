//! Rust code generation modules.

pub mod enums;
pub mod render;
pub mod structs;
pub mod types;

pub use enums::EnumEmitter;
pub use render::Renderer;
pub use structs::StructEmitter;
pub use types::{Synthesized, TypeMapper};
