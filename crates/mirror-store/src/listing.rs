//! Shared S3-v1 style pagination

use crate::{ListPage, ObjectSummary};

/// Cut one page out of `objects`, which must be sorted by key ascending.
pub(crate) fn paginate<I>(
    objects: I,
    marker: Option<&str>,
    page_size: usize,
    emit_next_marker: bool,
) -> ListPage
where
    I: IntoIterator<Item = ObjectSummary>,
{
    let mut remaining = objects
        .into_iter()
        .filter(|object| marker.is_none_or(|m| object.key.as_str() > m));

    let items: Vec<ObjectSummary> = remaining.by_ref().take(page_size.max(1)).collect();
    let is_truncated = remaining.next().is_some();
    let next_marker = if is_truncated && emit_next_marker {
        items.last().map(|object| object.key.clone())
    } else {
        None
    };

    ListPage {
        items,
        is_truncated,
        next_marker,
    }
}
