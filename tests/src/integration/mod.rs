//! Integration flows: the full donation lifecycle, atomicity under
//! failures, and the invocation boundary end to end.

pub mod lifecycle;
