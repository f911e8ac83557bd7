use std::ffi::c_void;
use std::os::raw::{c_char, c_int, c_ulong};

use rrtrans_session::{Session, WindowId};
use rrtrans_transport::TcpTransport;
use tracing::debug;

use crate::args;
use crate::error;
use crate::types::{HostConfig, RRConfig, RRTransHandle, SessionHandle, RRTRANS_ERROR, RRTRANS_OK};

/// Open a transport session for window `win`.
///
/// Returns null on failure.
///
/// # Safety
/// `config` must be non-null and stay valid until `RRTransDestroy` returns
/// successfully. `display` is not dereferenced.
#[no_mangle]
pub unsafe extern "C" fn RRTransInit(
    display: *mut c_void,
    win: c_ulong,
    config: *const RRConfig,
) -> RRTransHandle {
    const ORIGIN: &str = "RRTransInit";
    crate::ffi_boundary(ORIGIN, std::ptr::null_mut(), || {
        if config.is_null() {
            error::set_failure(ORIGIN, "configuration cannot be null");
            return std::ptr::null_mut();
        }
        let display_null = display.is_null();
        debug!(display_null, win, "initializing transport");

        match Session::open(WindowId(u64::from(win)), HostConfig(config), || {
            Ok(TcpTransport::new())
        }) {
            Ok(session) => Box::into_raw(Box::new(SessionHandle { session })) as RRTransHandle,
            Err(err) => {
                error::set_session_error(&err);
                std::ptr::null_mut()
            }
        }
    })
}

/// Connect the session to a receiver.
///
/// # Safety
/// `handle` must be null or a live handle; `receiver_name` must be null or a
/// valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn RRTransConnect(
    handle: RRTransHandle,
    receiver_name: *const c_char,
    port: c_int,
) -> c_int {
    const ORIGIN: &str = "RRTransConnect";
    crate::ffi_boundary(ORIGIN, RRTRANS_ERROR, || {
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::session_arg(handle, ORIGIN) }) else {
            return RRTRANS_ERROR;
        };
        // SAFETY: We validate null and UTF-8 in helper.
        let Some(address) = (unsafe { args::required_str_arg(receiver_name, "receiver_name", ORIGIN) })
        else {
            return RRTRANS_ERROR;
        };
        let Some(port) = args::port_arg(port, ORIGIN) else {
            return RRTRANS_ERROR;
        };

        match handle.session.connect(address, port) {
            Ok(()) => RRTRANS_OK,
            Err(err) => {
                error::set_session_error(&err);
                RRTRANS_ERROR
            }
        }
    })
}

/// Poll whether another frame can be allocated and sent without blocking.
///
/// Returns 1 when ready, 0 when not, -1 on failure.
///
/// # Safety
/// `handle` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn RRTransReady(handle: RRTransHandle) -> c_int {
    const ORIGIN: &str = "RRTransReady";
    crate::ffi_boundary(ORIGIN, RRTRANS_ERROR, || {
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::session_arg(handle, ORIGIN) }) else {
            return RRTRANS_ERROR;
        };

        match handle.session.ready() {
            Ok(ready) => c_int::from(ready),
            Err(err) => {
                error::set_session_error(&err);
                RRTRANS_ERROR
            }
        }
    })
}

/// Block until previously sent frames have been dispatched.
///
/// # Safety
/// `handle` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn RRTransSynchronize(handle: RRTransHandle) -> c_int {
    const ORIGIN: &str = "RRTransSynchronize";
    crate::ffi_boundary(ORIGIN, RRTRANS_ERROR, || {
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::session_arg(handle, ORIGIN) }) else {
            return RRTRANS_ERROR;
        };

        match handle.session.synchronize() {
            Ok(()) => RRTRANS_OK,
            Err(err) => {
                error::set_session_error(&err);
                RRTRANS_ERROR
            }
        }
    })
}

/// Release the transport and free the handle.
///
/// On failure the handle stays valid.
///
/// # Safety
/// `handle` must be null or a live handle. After success it must not be used.
#[no_mangle]
pub unsafe extern "C" fn RRTransDestroy(handle: RRTransHandle) -> c_int {
    const ORIGIN: &str = "RRTransDestroy";
    crate::ffi_boundary(ORIGIN, RRTRANS_ERROR, || {
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(session_handle) = (unsafe { args::session_arg(handle, ORIGIN) }) else {
            return RRTRANS_ERROR;
        };

        if let Err(err) = session_handle.session.release() {
            error::set_session_error(&err);
            return RRTRANS_ERROR;
        }

        // SAFETY: Caller guarantees this handle was allocated by RRTransInit.
        unsafe {
            drop(Box::from_raw(handle as *mut SessionHandle));
        }
        RRTRANS_OK
    })
}
