//! Remote listing scanner

use mirror_store::{CursorPolicy, ObjectStore};

use crate::index::{FileIndex, FileRecord};
use crate::{Error, Result};

/// Index every key in the store's bucket, following pagination to the end.
///
/// The next marker is the page's explicit cursor or, when the store's
/// [`CursorPolicy`] allows it, the last key of the page. Listings are in
/// ascending key order, so each cursor must sort strictly after the previous
/// one. A truncated page without a usable cursor, or with a cursor that does
/// not move forward, aborts the scan.
pub async fn scan_remote(store: &dyn ObjectStore) -> Result<FileIndex> {
    let mut index = FileIndex::new();
    let mut marker: Option<String> = None;

    loop {
        let page = store.list_objects(marker.as_deref()).await?;
        let last_key = page.items.last().map(|item| item.key.clone());

        index.extend(
            page.items
                .into_iter()
                .map(|item| FileRecord::new(item.key, item.size, item.last_modified)),
        );

        if !page.is_truncated {
            return Ok(index);
        }

        let next = match (page.next_marker, store.cursor_policy()) {
            (Some(next), _) => next,
            (None, CursorPolicy::NextMarkerOrLastKey) => last_key.ok_or_else(|| missing(store))?,
            (None, CursorPolicy::NextMarkerOnly) => return Err(missing(store)),
        };

        if marker.as_deref().is_some_and(|prev| next.as_str() <= prev) {
            return Err(Error::StalledCursor {
                bucket: store.bucket().to_string(),
                marker: next,
            });
        }
        marker = Some(next);
    }
}

fn missing(store: &dyn ObjectStore) -> Error {
    Error::MissingCursor {
        bucket: store.bucket().to_string(),
    }
}
