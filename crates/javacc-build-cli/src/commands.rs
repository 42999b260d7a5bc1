pub mod args;
pub mod generate;
pub mod list;
