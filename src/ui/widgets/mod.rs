// src/ui/widgets/mod.rs

pub mod footer;
pub mod history;
pub mod input;
pub mod results;
pub mod summary;
