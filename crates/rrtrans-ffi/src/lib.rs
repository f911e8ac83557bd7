//! rrtrans-ffi: C-ABI transport plugin entrypoints.
//!
//! Hosts load this library and drive one session per handle:
//! `RRTransInit` → `RRTransConnect` → (`RRTransGetFrame` → fill →
//! `RRTransSendFrame`)* → `RRTransDestroy`. Every failing call returns its
//! sentinel (null or -1) and records a message readable through
//! `RRTransGetError` on the same thread.

#![allow(non_snake_case)]

mod args;
mod error;
mod frame;
mod session;
mod types;

use std::panic::AssertUnwindSafe;

pub use error::MAXSTR;
pub use frame::{RRTransGetFrame, RRTransReleaseFrame, RRTransSendFrame};
pub use session::{RRTransConnect, RRTransDestroy, RRTransInit, RRTransReady, RRTransSynchronize};
pub use types::{
    RRConfig, RRFrame, RRTransHandle, RRCOMP_JPEG, RRCOMP_PROXY, RRCOMP_RGB, RRTRANS_ABGR,
    RRTRANS_ARGB, RRTRANS_BGR, RRTRANS_BGRA, RRTRANS_ERROR, RRTRANS_FORMATOPT, RRTRANS_OK,
    RRTRANS_RGB, RRTRANS_RGBA,
};

fn ffi_boundary<T>(origin: &str, on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error(origin);
            on_panic
        }
    }
}

/// Describe the most recent failure on this thread as
/// `Error in <origin> -- <message>`.
///
/// Never fails. The text is only meaningful after a failing call and stays
/// valid until the next failure on this thread.
#[no_mangle]
pub extern "C" fn RRTransGetError() -> *const std::os::raw::c_char {
    ffi_boundary("RRTransGetError", std::ptr::null(), error::last_error_ptr)
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;
    use std::ptr;

    use super::*;

    fn last_error() -> String {
        // SAFETY: RRTransGetError returns a pointer to a thread-local CString.
        unsafe { CStr::from_ptr(RRTransGetError()) }
            .to_string_lossy()
            .into_owned()
    }

    fn jpeg_config() -> RRConfig {
        RRConfig {
            compress: RRCOMP_JPEG,
            qual: 90,
            subsamp: 0,
        }
    }

    #[test]
    fn null_handle_fails_every_entrypoint() {
        // SAFETY: null handles are accepted inputs.
        unsafe {
            assert_eq!(RRTransConnect(ptr::null_mut(), c"localhost".as_ptr(), 4242), -1);
            assert_eq!(last_error(), "Error in RRTransConnect -- Invalid handle");

            assert!(RRTransGetFrame(ptr::null_mut(), 4, 4, RRTRANS_RGB, 0).is_null());
            assert_eq!(last_error(), "Error in RRTransGetFrame -- Invalid handle");

            assert_eq!(RRTransReady(ptr::null_mut()), -1);
            assert_eq!(last_error(), "Error in RRTransReady -- Invalid handle");

            assert_eq!(RRTransSynchronize(ptr::null_mut()), -1);
            assert_eq!(last_error(), "Error in RRTransSynchronize -- Invalid handle");

            assert_eq!(RRTransSendFrame(ptr::null_mut(), ptr::null_mut(), 0), -1);
            assert_eq!(last_error(), "Error in RRTransSendFrame -- Invalid handle");

            assert_eq!(RRTransDestroy(ptr::null_mut()), -1);
            assert_eq!(last_error(), "Error in RRTransDestroy -- Invalid handle");
        }
    }

    #[test]
    fn init_rejects_null_config() {
        // SAFETY: null config is an accepted input.
        let handle = unsafe { RRTransInit(ptr::null_mut(), 1, ptr::null()) };
        assert!(handle.is_null());
        assert_eq!(
            last_error(),
            "Error in RRTransInit -- configuration cannot be null"
        );
    }

    #[test]
    fn bgra_frame_under_jpeg() {
        let config = jpeg_config();
        // SAFETY: `config` outlives the session; the frame is released before destroy.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 0x400007, &config);
            assert!(!handle.is_null());

            let frame = RRTransGetFrame(handle, 640, 480, RRTRANS_BGRA, 0);
            assert!(!frame.is_null());
            let record = &*frame;
            assert_eq!(record.w, 640);
            assert_eq!(record.h, 480);
            assert!(record.pitch >= 640 * 4);
            assert_eq!(record.format, RRTRANS_BGRA);
            assert!(!record.bits.is_null());
            assert!(record.rbits.is_null());
            assert!(!record.opaque.is_null());

            // Pixel rows are writable through the exposed pointer.
            let rows = std::slice::from_raw_parts_mut(record.bits, (record.pitch * record.h) as usize);
            rows.fill(0xFF);

            assert_eq!(RRTransReleaseFrame(frame), 0);
            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn uncompressed_rgb_overrides_argb_request() {
        let config = RRConfig {
            compress: RRCOMP_RGB,
            ..jpeg_config()
        };
        // SAFETY: `config` outlives the session.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 1, &config);
            let frame = RRTransGetFrame(handle, 10, 10, RRTRANS_ARGB, 1);
            assert!(!frame.is_null());
            assert_eq!((*frame).format, RRTRANS_RGB);
            assert_eq!((*frame).pitch, 32);
            assert!(!(*frame).rbits.is_null());
            assert_eq!(RRTransReleaseFrame(frame), 0);
            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn send_rejects_record_without_frame() {
        let config = jpeg_config();
        // SAFETY: `config` outlives the session; `record` is caller-owned.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 1, &config);
            let mut record = RRFrame::default();
            assert_eq!(RRTransSendFrame(handle, &mut record, 0), -1);
            assert_eq!(last_error(), "Error in RRTransSendFrame -- Invalid frame handle");

            assert_eq!(RRTransSendFrame(handle, ptr::null_mut(), 0), -1);
            assert_eq!(RRTransReleaseFrame(ptr::null_mut()), -1);
            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn send_before_connect_reports_transport_failure() {
        let config = jpeg_config();
        // SAFETY: `config` outlives the session; the frame is consumed by send.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 1, &config);
            let frame = RRTransGetFrame(handle, 8, 8, RRTRANS_RGB, 0);
            assert_eq!(RRTransSendFrame(handle, frame, 1), -1);
            assert_eq!(last_error(), "Error in transport::transmit -- not connected");
            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn invalid_arguments_are_reported() {
        let config = jpeg_config();
        // SAFETY: `config` outlives the session.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 1, &config);

            assert!(RRTransGetFrame(handle, -1, 8, RRTRANS_RGB, 0).is_null());
            assert_eq!(
                last_error(),
                "Error in RRTransGetFrame -- width cannot be negative (-1)"
            );

            assert!(RRTransGetFrame(handle, 0, 8, RRTRANS_RGB, 0).is_null());
            assert!(last_error().starts_with("Error in transport::acquire_buffer -- invalid frame dimensions"));

            assert_eq!(RRTransConnect(handle, ptr::null(), 4242), -1);
            assert_eq!(
                last_error(),
                "Error in RRTransConnect -- receiver_name cannot be null"
            );

            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn unknown_format_is_treated_as_rgb() {
        let config = jpeg_config();
        // SAFETY: `config` outlives the session.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 1, &config);
            let frame = RRTransGetFrame(handle, 4, 4, 42, 0);
            assert_eq!((*frame).format, RRTRANS_RGB);
            assert_eq!(RRTransReleaseFrame(frame), 0);
            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn last_error_reflects_only_latest_failure() {
        // SAFETY: null handles are accepted inputs.
        unsafe {
            assert_eq!(RRTransReady(ptr::null_mut()), -1);
            assert_eq!(RRTransSynchronize(ptr::null_mut()), -1);
        }
        assert_eq!(last_error(), "Error in RRTransSynchronize -- Invalid handle");
    }

    #[test]
    fn ready_before_connect_reports_headroom() {
        let config = jpeg_config();
        // SAFETY: `config` outlives the session.
        unsafe {
            let handle = RRTransInit(ptr::null_mut(), 1, &config);
            assert_eq!(RRTransReady(handle), 1);
            assert_eq!(RRTransSynchronize(handle), 0);
            assert_eq!(RRTransDestroy(handle), 0);
        }
    }

    #[test]
    fn panics_are_contained() {
        let value = ffi_boundary("RRTransTest", -1, || -> i32 { panic!("boom") });
        assert_eq!(value, -1);
        assert_eq!(last_error(), "Error in RRTransTest -- panic across FFI boundary");
    }
}
