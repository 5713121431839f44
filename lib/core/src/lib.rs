//! Core types shared by the ABMS integration crates.
//!
//! This crate provides the error handling foundation and the item batch
//! convention used to hand node output back to the workflow host.

pub mod error;
pub mod item;

pub use error::Result;
pub use item::{Item, ItemBatch};
