use std::future::Future;

use crate::domain::value_objects::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first failing item; later items are never visited.
    AbortOnError,
    /// Record the failure and move on to the next item.
    ContinueOnError,
}

/// Accumulator threaded through a sequential fold.
#[derive(Debug)]
pub struct FoldOutcome<T, E> {
    pub results: Vec<Result<T, E>>,
    pub progress: Progress,
    pub aborted: bool,
}

impl<T, E> FoldOutcome<T, E> {
    fn starting(total: usize) -> Self {
        Self {
            results: Vec::with_capacity(total),
            progress: Progress::starting(total),
            aborted: false,
        }
    }

    pub fn visited(&self) -> usize {
        self.results.len()
    }

    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.results.iter().filter_map(|result| result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &E> {
        self.results.iter().filter_map(|result| result.as_ref().err())
    }

    /// Splits into the successful values and the error that stopped the fold,
    /// if it was aborted.
    pub fn into_parts(self) -> (Vec<T>, Option<E>) {
        let mut values = Vec::new();
        let mut abort_error = None;
        let aborted = self.aborted;
        for result in self.results {
            match result {
                Ok(value) => values.push(value),
                Err(error) if aborted => abort_error = Some(error),
                Err(_) => {}
            }
        }
        (values, abort_error)
    }
}

/// Runs `step` over `items` one at a time, awaiting each before starting the
/// next. `on_progress` fires after every item that counts towards progress:
/// successes always, failures only under `ContinueOnError`.
pub async fn fold_sequential<I, T, E, F, Fut, P>(
    items: Vec<I>,
    policy: ErrorPolicy,
    mut step: F,
    mut on_progress: P,
) -> FoldOutcome<T, E>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: FnMut(Progress),
{
    let mut outcome = FoldOutcome::starting(items.len());

    for item in items {
        let result = step(item).await;
        let failed = result.is_err();
        outcome.results.push(result);

        if failed && policy == ErrorPolicy::AbortOnError {
            outcome.aborted = true;
            break;
        }

        outcome.progress = outcome.progress.advance();
        on_progress(outcome.progress);
    }

    outcome
}
