/*!
    Message of the most recent failure on the current thread.

    Every public operation that fails records its error here before returning,
    for callers that only keep a success flag around. The structured
    [`Error`] returned by the operation carries the same information.
*/

use std::cell::RefCell;

use tracing::warn;

use media_types::{Error, Result};

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/**
    Message of the last failed operation on this thread, if any.
*/
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

pub fn clear_last_error() {
    LAST_ERROR.with(|slot| slot.borrow_mut().take());
}

fn set_last_error(error: &Error) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(error.to_string()));
}

/**
    Record the error of a failed operation before it is returned.
*/
pub(crate) trait Record {
    fn record(self, operation: &'static str) -> Self;
}

impl<T> Record for Result<T> {
    fn record(self, operation: &'static str) -> Self {
        self.inspect_err(|e| {
            warn!(operation, error = %e, "media source operation failed");
            set_last_error(e);
        })
    }
}
