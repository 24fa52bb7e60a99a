pub mod command;
mod utils;
