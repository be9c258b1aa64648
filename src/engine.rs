//! Concurrent execution of registered analyzers against one context.
//!
//! Every analyzer runs fanned out on the rayon pool and the engine waits
//! for all of them before returning (fan-out/fan-in, no streaming). Faults
//! are isolated per analyzer: a returned error or a panic in one analyzer
//! never reaches its siblings or the caller.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use thiserror::Error;
use tracing::error;

use crate::context::AnalysisContext;
use crate::diagnostics::AnalyzerMessage;
use crate::registry::{AnalyzerDescriptor, Registry};

/// A captured per-analyzer fault.
#[derive(Error, Debug)]
pub enum AnalyzerFailure {
    #[error("analyzer failed: {0}")]
    Failed(anyhow::Error),
    #[error("analyzer panicked: {0}")]
    Panicked(String),
}

/// One analyzer's outcome: its messages or its captured failure.
#[derive(Debug)]
pub struct AnalysisResult {
    pub analyzer: String,
    pub output: Result<Vec<AnalyzerMessage>, AnalyzerFailure>,
}

impl AnalysisResult {
    pub fn is_failure(&self) -> bool {
        self.output.is_err()
    }
}

fn panic_payload_text(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn run_one(descriptor: &AnalyzerDescriptor, ctx: &AnalysisContext) -> AnalysisResult {
    let callable = &descriptor.callable;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| callable(ctx)));
    let output = match outcome {
        Ok(Ok(messages)) => Ok(messages
            .into_iter()
            .map(|message| AnalyzerMessage {
                analyzer: descriptor.name.clone(),
                message,
                short_description: descriptor.short_description.clone(),
                help_uri: descriptor.help_uri.clone(),
            })
            .collect()),
        Ok(Err(e)) => Err(AnalyzerFailure::Failed(e)),
        Err(payload) => Err(AnalyzerFailure::Panicked(panic_payload_text(payload))),
    };
    AnalysisResult {
        analyzer: descriptor.name.clone(),
        output,
    }
}

/// Run every registered analyzer concurrently, preserving failures.
///
/// Returns exactly one [`AnalysisResult`] per registered analyzer,
/// regardless of how many fail. Results are indexed by submission order
/// (the registry's name order); completion order is unspecified.
///
/// There is no per-analyzer timeout: an analyzer that never returns blocks
/// the barrier. Callers needing a bound must impose it around the whole
/// call.
pub fn run_all_safely(registry: &Registry, ctx: &AnalysisContext) -> Vec<AnalysisResult> {
    registry
        .descriptors()
        .par_iter()
        .map(|descriptor| run_one(descriptor, ctx))
        .collect()
}

/// Run every registered analyzer concurrently, dropping failures.
///
/// Failures are logged on the error channel and contribute zero messages;
/// this function never returns an error and never panics because of an
/// analyzer. Message order follows analyzer submission order; consumers
/// needing display determinism sort before reporting.
pub fn run_all(registry: &Registry, ctx: &AnalysisContext) -> Vec<AnalyzerMessage> {
    run_all_safely(registry, ctx)
        .into_iter()
        .filter_map(|result| match result.output {
            Ok(messages) => Some(messages),
            Err(failure) => {
                error!("analyzer {:?} did not complete: {}", result.analyzer, failure);
                None
            }
        })
        .flatten()
        .collect()
}
