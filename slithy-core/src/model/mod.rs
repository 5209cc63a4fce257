//! Context models and the walk that samples from them.
//!
//! This module provides:
//! - Sentinel-wrapped tokens over any symbol alphabet (`Token`)
//! - Fixed-order context models (`ContextModel`)
//! - Internal weighted next-token distributions (`State`)
//! - The bounded random walk (`sampler`)

/// Token alphabet wrapper with reserved `Start` / `End` sentinels.
pub mod token;

/// Fixed-order context model (`n >= 2`).
///
/// Handles sequence ingestion, next-token counting, parallel construction,
/// model merging and frequency-proportional prediction.
pub mod context_model;

/// Bounded random walk over a context model.
///
/// Stops on `End`, on a length cap or on a step cap, and fails on an
/// unseen context.
pub mod sampler;

/// Weighted next-token distribution of a single context.
///
/// This module is not exposed publicly.
mod state;

pub use context_model::ContextModel;
pub use sampler::{Limit, sample, sample_with_suffix};
pub use token::{Symbol, Token};
