//! Thread-local free-list for builder state.
//!
//! Each thread keeps at most one recycled values buffer, so acquiring and
//! releasing never touches shared state. A buffer that spilled to the heap
//! keeps its capacity, so a call site with many holes stops reallocating
//! after its first invocation on a thread.

use crate::domain::template::Values;
use std::cell::Cell;

thread_local! {
    static FREE: Cell<Option<Values>> = const { Cell::new(None) };
}

/// Pop the recycled buffer or start a new inline one.
pub(crate) fn acquire() -> Values {
    FREE.try_with(Cell::take)
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Return a buffer to this thread's free-list.
pub(crate) fn release(mut values: Values) {
    values.clear();
    // During thread teardown the free-list may already be gone; the buffer
    // is simply dropped then.
    let _ = FREE.try_with(move |free| free.set(Some(values)));
}

#[cfg(test)]
pub(crate) fn free_capacity() -> Option<usize> {
    FREE.with(|free| {
        let values = free.take();
        let capacity = values.as_ref().map(|v| v.capacity());
        free.set(values);
        capacity
    })
}
