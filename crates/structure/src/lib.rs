pub mod cli;
pub mod share;
pub mod tree;
