//! buildprep-lib: Core types and logic for buildprep
//!
//! This crate provides the fundamental pieces of the bootstrapper:
//! - `manifest`: the declared package list, dependency table and toolchain
//! - `exec`: external process invocation with explicit working directories
//! - `pipeline`: the linear prepare-and-delegate stages
//! - `lock`: advisory per-root lock guarding concurrent invocations

pub mod error;
pub mod exec;
pub mod lock;
pub mod manifest;
pub mod pipeline;
