//! Supplement recommendation engine: questionnaire answers in, a ranked shortlist out, with the
//! user's profile and assessment history updated along the way.

pub mod config;
pub mod error;
pub mod recommendations;
pub mod telemetry;
