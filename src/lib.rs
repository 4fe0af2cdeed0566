pub mod apply;
pub mod args;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod expr;
pub mod function;
pub mod group;
pub mod target;
