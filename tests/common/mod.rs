// Allow dead code since helpers are used by different test files compiled separately
#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;
