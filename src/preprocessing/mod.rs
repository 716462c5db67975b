//! Image cleanup applied before text recognition
//!
//! Handwriting photos carry sensor noise and uneven lighting; this module
//! turns a decoded photo into a clean two-valued image the recognition
//! engine does better on.

pub mod pipeline;
pub mod steps;

pub use pipeline::preprocess;
