//! Circuit gadgets for regex transition checks and capture extraction
//!
//! - `key`, `packed`, `transition`: per-step checks against the transition table
//! - `capture`, `substring`: single-group capture masks and bounded extraction
//! - `subarray`: bounded copy out of a fixed-size array
//! - `alloc`, `range`: hint allocation, bit-size checks and dynamic indexing

pub mod alloc;
pub mod capture;
pub mod key;
pub mod packed;
pub mod range;
pub mod subarray;
pub mod substring;
pub mod transition;
