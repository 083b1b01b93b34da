#![forbid(unsafe_code)]
//! Authorization test matrix toolkit.
//!
//! A specification of roles, endpoints, and expected HTTP outcomes lives
//! in a [`spec::SpecStore`]; a [`matrix::ResultsGrid`] reconciles the
//! unordered stream of per-cell results a [`run::Runner`] produces for
//! one rendered snapshot of that specification.

pub mod matrix;
pub mod render;
pub mod run;
pub mod spec;

pub type Result<T> = anyhow::Result<T>;
