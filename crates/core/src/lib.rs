#![forbid(unsafe_code)]

pub mod evaluator;
pub mod model;

pub use evaluator::{Submission, Verdict, evaluate};
