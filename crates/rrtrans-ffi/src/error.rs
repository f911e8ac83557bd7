use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use rrtrans_session::{ErrorRecord, SessionError};

/// Capacity of the rendered error text, including the terminating NUL.
pub const MAXSTR: usize = 256;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

/// Render and store `record`, truncated to fit `MAXSTR`.
pub(crate) fn set_error(record: &ErrorRecord) {
    let mut text = record.to_string().replace('\0', "?");
    if text.len() >= MAXSTR {
        let mut end = MAXSTR - 1;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    LAST_ERROR.with(|state| {
        // Interior NULs were replaced above.
        *state.borrow_mut() = CString::new(text).unwrap_or_default();
    });
}

pub(crate) fn set_failure(origin: &str, message: impl Into<String>) {
    set_error(&ErrorRecord::new(origin, message));
}

pub(crate) fn set_invalid_handle(origin: &str) {
    set_failure(origin, "Invalid handle");
}

pub(crate) fn set_session_error(err: &SessionError) {
    set_error(&err.record());
}

pub(crate) fn set_panic_error(origin: &str) {
    set_failure(origin, "panic across FFI boundary");
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

#[cfg(test)]
pub(crate) fn last_error_string() -> String {
    LAST_ERROR.with(|state| state.borrow().to_string_lossy().into_owned())
}
