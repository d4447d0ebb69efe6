//! Completion estimates for step executions.
//!
//! The estimator picks the first applicable basis, in order:
//! a finished step is complete; without history the step is assumed half
//! done; otherwise the step's read count is compared with the historical
//! mean read count, falling back to elapsed time against the historical
//! mean duration when past executions read nothing.

use crate::history::StepExecutionHistory;
use batchlens_api::StepExecution;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionBasis {
    EndTime,
    NoHistory,
    NoInformation,
    Duration,
    ReadCount,
    Unknown,
}

/// Human readable description of a basis, used in progress messages.
pub fn describe_basis(basis: CompletionBasis) -> &'static str {
    match basis {
        CompletionBasis::EndTime => "end time (already finished)",
        CompletionBasis::NoHistory => "no history",
        CompletionBasis::NoInformation => "no information",
        CompletionBasis::Duration => "extrapolated duration",
        CompletionBasis::ReadCount => "extrapolated read count",
        CompletionBasis::Unknown => "unknown",
    }
}

/// Point-in-time completion estimate. The fraction is not clamped: a step
/// that has outrun its history reports more than 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEstimate {
    fraction: f64,
    basis: CompletionBasis,
    elapsed_millis: f64,
}

impl ProgressEstimate {
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn basis(&self) -> CompletionBasis {
        self.basis
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_millis
    }

    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }

    pub fn message(&self) -> String {
        format!(
            "This execution is estimated to be {:.0}% complete after {:.0} ms based on {}",
            self.percent(),
            self.elapsed_millis,
            describe_basis(self.basis)
        )
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            fraction: self.fraction,
            percent: crate::history::round2(self.percent()),
            basis: self.basis,
            basis_description: describe_basis(self.basis),
            elapsed_millis: self.elapsed_millis,
            message: self.message(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub fraction: f64,
    pub percent: f64,
    pub basis: CompletionBasis,
    pub basis_description: &'static str,
    pub elapsed_millis: f64,
    pub message: String,
}

/// Estimate progress as of the current instant.
pub fn estimate(step: &StepExecution, history: &StepExecutionHistory) -> ProgressEstimate {
    estimate_at(step, history, Utc::now())
}

/// Estimate progress as of `now`. Missing start or end times are read as
/// `now`, so a running step that has not started reports zero elapsed time.
pub fn estimate_at(
    step: &StepExecution,
    history: &StepExecutionHistory,
    now: DateTime<Utc>,
) -> ProgressEstimate {
    let start = step.start_time.unwrap_or(now);
    let end = step.end_time.unwrap_or(now);
    let elapsed_millis = (end - start).num_milliseconds() as f64;

    let (fraction, basis) = if step.end_time.is_some() {
        (1.0, CompletionBasis::EndTime)
    } else if history.count() == 0 {
        (0.5, CompletionBasis::NoHistory)
    } else if history.read_count().mean() == 0.0 {
        let mean_duration = history.duration().mean();
        if mean_duration == 0.0 {
            (0.5, CompletionBasis::NoInformation)
        } else {
            (elapsed_millis / mean_duration, CompletionBasis::Duration)
        }
    } else {
        (
            step.read_count as f64 / history.read_count().mean(),
            CompletionBasis::ReadCount,
        )
    };

    ProgressEstimate {
        fraction,
        basis,
        elapsed_millis,
    }
}
