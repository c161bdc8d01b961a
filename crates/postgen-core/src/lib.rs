//! # postgen-core
//!
//! Core library for postgen providing:
//! - The typed hook configuration (`postgen.yaml` / scaffolder context dumps)
//! - The shared error type
//! - Explicit step outcomes and the per-run report
//! - Detection of the external tools the hook shells out to

pub mod config;
pub mod error;
pub mod outcome;
pub mod tools;

pub use config::{HookConfig, HostingMode, Layout, ProjectType, Visibility};
pub use error::{Error, Result};
pub use outcome::{RunPhase, RunReport, StepOutcome, StepRecord};
pub use tools::{Tool, Toolchain};
