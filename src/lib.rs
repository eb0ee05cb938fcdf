#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
extern crate alloc;
mod config;
mod entity;
mod factory;
mod pool;

pub use config::*;
pub use entity::*;
pub use factory::*;
pub use pool::*;
