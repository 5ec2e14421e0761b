//! Command implementations for the mvvmgen CLI

pub mod check;
pub mod common;
pub mod generate;
pub mod graph;

pub use check::check_command;
pub use generate::generate_command;
pub use graph::graph_command;
