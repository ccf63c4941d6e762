pub mod assets;
pub mod paste;
