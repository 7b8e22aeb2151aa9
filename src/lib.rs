pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod gate;
pub mod generator;
pub mod vault;
