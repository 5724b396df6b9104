//! Core types, the store trait, and the evaluation pipeline for Facultas.
//!
//! This crate has no HTTP or database dependencies.
//! All other crates depend on it.
//!
//! The pipeline runs leaves first: [`rubric`] supplies the grading schema,
//! [`resolver`] decides whether a caller may submit, [`submission`] validates
//! and persists a score map, and [`aggregate`] derives averages on demand.

// Store futures carry explicit `Send` bounds in the trait signatures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod assignment;
pub mod error;
pub mod evaluation;
pub mod identity;
pub mod period;
pub mod resolver;
pub mod roster;
pub mod rubric;
pub mod sentiment;
pub mod store;
pub mod submission;

pub use error::{Error, Result};
