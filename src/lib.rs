#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod analysis;
pub mod columns;
pub mod encoding;
pub mod kasiski;
pub mod language;
pub mod vote;

pub use analysis::{analyse, Analysis, Config, Error};
