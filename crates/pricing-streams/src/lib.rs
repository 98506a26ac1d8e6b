//! Price history bounded context.
//!
//! Every (product, shop chain) pair owns one append-only stream. Enrolling a
//! product in a chain opens the stream, price changes extend it, and the
//! price history is rebuilt by replaying it.

pub mod application;
pub mod domain;
