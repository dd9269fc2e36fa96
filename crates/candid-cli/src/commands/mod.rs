pub mod decode;
pub mod dump;
pub mod error;
pub mod hash;
pub mod input;
pub mod principal;

#[cfg(test)]
mod input_tests;
