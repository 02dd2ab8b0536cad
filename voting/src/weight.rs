//! Vote weight computation.
//!
//! Weight bounds the influence of any single vote: a performance-derived base
//! in a narrow band around 1.0, multiplied up for reviewer/mediator roles,
//! clamped to `[0.1, 2.0]` at each step.

use accord_types::{AgentProfile, AgentRole, PerformanceMetrics};

pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 2.0;

/// How strongly the averaged performance scores pull the base weight above 1.0.
const METRIC_INFLUENCE: f64 = 0.3;
/// Substitute for a missing performance score.
const DEFAULT_SCORE: f64 = 0.5;
const REVIEWER_MULTIPLIER: f64 = 1.2;
const MEDIATOR_MULTIPLIER: f64 = 1.1;

fn clamp(weight: f64) -> f64 {
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Compute the vote weight for an agent.
///
/// `base = clamp(1.0 + ((quality + consensus) / 2) * 0.3)`, with 0.5 standing
/// in for either missing score. Reviewer and mediator multipliers compose on
/// top of the base, and the product is re-clamped.
pub fn vote_weight(profile: &AgentProfile) -> f64 {
    weight_from(
        &profile.metrics,
        profile.has_role(AgentRole::Reviewer),
        profile.has_role(AgentRole::Mediator),
    )
}

/// Weight for an agent the directory no longer knows: default scores, no
/// role multipliers.
pub fn default_weight() -> f64 {
    weight_from(&PerformanceMetrics::default(), false, false)
}

fn weight_from(metrics: &PerformanceMetrics, is_reviewer: bool, is_mediator: bool) -> f64 {
    let quality = metrics.quality_score.unwrap_or(DEFAULT_SCORE);
    let consensus = metrics.consensus_score.unwrap_or(DEFAULT_SCORE);
    let mut weight = clamp(1.0 + ((quality + consensus) / 2.0) * METRIC_INFLUENCE);

    if is_reviewer {
        weight *= REVIEWER_MULTIPLIER;
    }
    if is_mediator {
        weight *= MEDIATOR_MULTIPLIER;
    }
    clamp(weight)
}
