//! Batch reader core: stateless read aggregation over a debate-market
//! factory and its per-debate instances.
//!
//! Every operation is a pure function of its inputs and the gateway's
//! current answers. Nothing is cached between calls, nothing is mutated,
//! and a failed upstream read fails the whole operation; no partial lists.

pub mod batch;
pub mod roster;
pub mod sources;

pub use batch::BatchReader;
