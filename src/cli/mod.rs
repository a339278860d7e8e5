pub mod command;
pub mod config;
pub mod inspect;
pub mod write;
