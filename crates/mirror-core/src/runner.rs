//! Sequential async runner
//!
//! Applies an async action to each item of an ordered sequence or keyed map,
//! strictly one at a time. The next item starts only after the previous
//! action resolved, and the first failure skips everything after it.

use std::future::Future;

/// Failure of the item at `index`; items before it completed, items after it
/// never ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupted<E> {
    pub index: usize,
    pub error: E,
}

impl<E> Interrupted<E> {
    pub fn into_error(self) -> E {
        self.error
    }
}

/// Thread an owned accumulator through `step` for each item in order.
///
/// `step` receives the accumulator, the item's position and the item, and
/// hands the accumulator back. On failure the accumulator is dropped.
pub async fn fold_sequential<I, A, F, Fut, E>(
    items: I,
    init: A,
    mut step: F,
) -> Result<A, Interrupted<E>>
where
    I: IntoIterator,
    F: FnMut(A, usize, I::Item) -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    let mut acc = init;
    for (index, item) in items.into_iter().enumerate() {
        acc = step(acc, index, item)
            .await
            .map_err(|error| Interrupted { index, error })?;
    }
    Ok(acc)
}

/// Run `action` for each item in order and return how many items ran.
///
/// For keyed maps pass `map.iter()`; the item is then the `(key, value)` pair.
pub async fn for_each_sequential<I, F, Fut, E>(
    items: I,
    mut action: F,
) -> Result<usize, Interrupted<E>>
where
    I: IntoIterator,
    F: FnMut(usize, I::Item) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    fold_sequential(items, 0usize, |done, index, item| {
        let pending = action(index, item);
        async move { pending.await.map(|()| done + 1) }
    })
    .await
}
