use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use crate::error;
use crate::types::{RRTransHandle, SessionHandle};

/// Borrow the session behind `handle`, recording an error under `origin` if
/// it is null.
///
/// # Safety
/// `handle` must be null or a live handle returned by `RRTransInit`.
pub(crate) unsafe fn session_arg<'a>(
    handle: RRTransHandle,
    origin: &str,
) -> Option<&'a mut SessionHandle> {
    if handle.is_null() {
        error::set_invalid_handle(origin);
        return None;
    }

    // SAFETY: The caller guarantees `handle` came from `RRTransInit` and has not been destroyed.
    Some(unsafe { &mut *(handle as *mut SessionHandle) })
}

/// Convert a required C string argument into UTF-8 `&str`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn required_str_arg<'a>(
    value: *const c_char,
    name: &str,
    origin: &str,
) -> Option<&'a str> {
    if value.is_null() {
        error::set_failure(origin, format!("{name} cannot be null"));
        return None;
    }

    let as_cstr = {
        // SAFETY: The caller guarantees `value` points to a valid NUL-terminated C string.
        unsafe { CStr::from_ptr(value) }
    };

    match as_cstr.to_str() {
        Ok(v) => Some(v),
        Err(_) => {
            error::set_failure(origin, format!("{name} must be valid UTF-8"));
            None
        }
    }
}

/// Validate a TCP port number.
pub(crate) fn port_arg(port: c_int, origin: &str) -> Option<u16> {
    match u16::try_from(port) {
        Ok(port) => Some(port),
        Err(_) => {
            error::set_failure(origin, format!("port {port} out of range"));
            None
        }
    }
}

/// Validate a frame dimension.
pub(crate) fn dimension_arg(value: c_int, name: &str, origin: &str) -> Option<u32> {
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            error::set_failure(origin, format!("{name} cannot be negative ({value})"));
            None
        }
    }
}
