pub mod footer;
pub mod header;
pub mod menu;
pub mod render;
