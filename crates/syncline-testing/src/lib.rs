//! Test utilities for Syncline services.
//!
//! Provides `MockTrackerServer`, an in-process stand-in for the remote issue
//! tracker. Import in `#[cfg(test)]` blocks only — never in production code.

pub mod tracker;
