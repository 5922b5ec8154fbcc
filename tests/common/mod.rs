#![allow(dead_code)]

pub mod logs;
pub mod mocks;
pub mod test_utils;

pub use logs::*;
pub use mocks::*;
pub use test_utils::*;
