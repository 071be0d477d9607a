//! formgrade-core — Answer validation and scoring engine.
//!
//! This crate defines the form/answer data model, the per-type validators,
//! the score calculator and the grading pipeline that turns a submission into
//! evaluated answers plus a total score.

pub mod authoring;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod model;
pub mod parser;
pub mod report;
pub mod score;
pub mod statistics;
pub mod validate;
