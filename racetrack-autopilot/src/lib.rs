pub mod benchmark;
pub mod config;
pub mod interactive;
pub mod roster;
pub mod runner;
pub mod util;
