// Library target exists solely for criterion benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `typewise::scoring::*` / `typewise::session::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by benchmarks and integration tests
pub mod analysis;
pub mod identity;
pub mod scoring;
pub mod session;
pub mod store;

// Private: required transitively by the public modules (won't compile without them)
mod app;
mod config;
mod event;
mod ui;
