//! Concurrent grading of many submissions to one form.
//!
//! Each submission is graded independently on the blocking pool, bounded by a
//! semaphore. Results come back in input order and are identical to grading
//! the submissions one by one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::engine::GradingEngine;
use crate::model::{FormDefinition, Submission};
use crate::report::ResponseRecord;

/// Progress reporting trait.
pub trait BatchReporter: Send + Sync {
    fn on_graded(&self, index: usize, record: &ResponseRecord);
    fn on_batch_complete(&self, total: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl BatchReporter for NoopReporter {
    fn on_graded(&self, _: usize, _: &ResponseRecord) {}
    fn on_batch_complete(&self, _: usize, _: Duration) {}
}

/// Grade `submissions` against `form` with at most `parallelism` in flight.
pub async fn grade_batch(
    engine: &GradingEngine,
    form: Arc<FormDefinition>,
    submissions: Vec<Submission>,
    parallelism: usize,
    progress: &dyn BatchReporter,
) -> Result<Vec<ResponseRecord>> {
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
    let total = submissions.len();

    let mut futures = FuturesUnordered::new();
    for (index, submission) in submissions.into_iter().enumerate() {
        let engine = engine.clone();
        let form = Arc::clone(&form);
        let semaphore = Arc::clone(&semaphore);

        futures.push(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

            let record = tokio::task::spawn_blocking(move || {
                let graded = engine.grade_submission(&form, &submission);
                ResponseRecord::from_graded(&form.id, submission, graded)
            })
            .await
            .with_context(|| format!("grading task for submission {index} failed"))?;

            anyhow::Ok((index, record))
        });
    }

    let mut slots: Vec<Option<ResponseRecord>> = vec![None; total];
    while let Some(result) = futures.next().await {
        let (index, record) = result?;
        progress.on_graded(index, &record);
        slots[index] = Some(record);
    }

    progress.on_batch_complete(total, start.elapsed());
    tracing::debug!("graded {total} submission(s) for form {}", form.id);

    Ok(slots.into_iter().flatten().collect())
}
