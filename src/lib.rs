#[macro_use]
extern crate text_io;

pub mod scrabble;
pub mod utils;
