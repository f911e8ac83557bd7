use std::ffi::c_void;
use std::os::raw::c_int;

use rrtrans_format::PixelFormat;
use rrtrans_session::Frame;
use tracing::warn;

use crate::args;
use crate::error;
use crate::types::{RRFrame, RRTransHandle, RRTRANS_ERROR, RRTRANS_OK};

fn into_record(frame: Frame) -> *mut RRFrame {
    let mut frame = Box::new(frame);
    let bits = frame.bits_mut().as_mut_ptr();
    let rbits = frame
        .right_bits_mut()
        .map_or(std::ptr::null_mut(), <[u8]>::as_mut_ptr);

    let record = RRFrame {
        w: frame.width() as c_int,
        h: frame.height() as c_int,
        pitch: frame.pitch() as c_int,
        bits,
        rbits,
        format: frame.format() as c_int,
        opaque: Box::into_raw(frame) as *mut c_void,
    };
    Box::into_raw(Box::new(record))
}

/// Take ownership of a record and its frame. Returns `None` if either pointer
/// is missing, leaving the record untouched.
///
/// # Safety
/// `frame` must be null or a record returned by `RRTransGetFrame` that has
/// not been sent or released.
unsafe fn take_record(frame: *mut RRFrame) -> Option<Frame> {
    if frame.is_null() {
        return None;
    }
    // SAFETY: Pointer validity is guaranteed by the caller.
    let opaque = unsafe { (*frame).opaque };
    if opaque.is_null() {
        return None;
    }

    // SAFETY: Both boxes were leaked by `into_record`.
    unsafe {
        drop(Box::from_raw(frame));
        Some(*Box::from_raw(opaque as *mut Frame))
    }
}

/// Allocate a frame of `width` x `height` pixels in the requested format.
///
/// The record's `format` reports the layout actually allocated, which can
/// differ from `format` under uncompressed RGB. Unknown formats are treated
/// as RGB. Returns null on failure.
///
/// # Safety
/// `handle` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn RRTransGetFrame(
    handle: RRTransHandle,
    width: c_int,
    height: c_int,
    format: c_int,
    stereo: c_int,
) -> *mut RRFrame {
    const ORIGIN: &str = "RRTransGetFrame";
    crate::ffi_boundary(ORIGIN, std::ptr::null_mut(), || {
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::session_arg(handle, ORIGIN) }) else {
            return std::ptr::null_mut();
        };
        let Some(width) = args::dimension_arg(width, "width", ORIGIN) else {
            return std::ptr::null_mut();
        };
        let Some(height) = args::dimension_arg(height, "height", ORIGIN) else {
            return std::ptr::null_mut();
        };
        let format = PixelFormat::try_from(format).unwrap_or_else(|err| {
            warn!(error = %err, "treating unknown format as RGB");
            PixelFormat::Rgb
        });

        match handle.session.allocate(width, height, format, stereo != 0) {
            Ok(frame) => into_record(frame),
            Err(err) => {
                error::set_session_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Send a filled frame.
///
/// Once the frame has been handed to the transport the record is freed,
/// whether or not transmission succeeds. A record without a frame is
/// rejected and left alone.
///
/// # Safety
/// `handle` must be null or a live handle; `frame` must be null or a record
/// returned by `RRTransGetFrame` that has not been sent or released.
#[no_mangle]
pub unsafe extern "C" fn RRTransSendFrame(
    handle: RRTransHandle,
    frame: *mut RRFrame,
    sync: c_int,
) -> c_int {
    const ORIGIN: &str = "RRTransSendFrame";
    crate::ffi_boundary(ORIGIN, RRTRANS_ERROR, || {
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::session_arg(handle, ORIGIN) }) else {
            return RRTRANS_ERROR;
        };
        // SAFETY: Record validity is guaranteed by the caller.
        let Some(frame) = (unsafe { take_record(frame) }) else {
            error::set_failure(ORIGIN, "Invalid frame handle");
            return RRTRANS_ERROR;
        };

        match handle.session.send(frame, sync != 0) {
            Ok(()) => RRTRANS_OK,
            Err(err) => {
                error::set_session_error(&err);
                RRTRANS_ERROR
            }
        }
    })
}

/// Abandon an allocated frame without sending it.
///
/// # Safety
/// `frame` must be null or a record returned by `RRTransGetFrame` that has
/// not been sent or released.
#[no_mangle]
pub unsafe extern "C" fn RRTransReleaseFrame(frame: *mut RRFrame) -> c_int {
    const ORIGIN: &str = "RRTransReleaseFrame";
    crate::ffi_boundary(ORIGIN, RRTRANS_ERROR, || {
        // SAFETY: Record validity is guaranteed by the caller.
        match unsafe { take_record(frame) } {
            Some(frame) => {
                drop(frame);
                RRTRANS_OK
            }
            None => {
                error::set_failure(ORIGIN, "Invalid frame handle");
                RRTRANS_ERROR
            }
        }
    })
}
