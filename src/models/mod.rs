pub mod content;
pub mod screen;
