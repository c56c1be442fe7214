//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The host does the network I/O: it hands the library a fetch callback at
//! construction, and `HostTransport` adapts that callback to the core
//! `Transport` trait. Results come back in one `FfiCallResult` envelope
//! carrying either the raw body or an error code and message.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use petfinder_core::{Client, Transport, TransportError};

/// Host-side HTTP GET.
///
/// Called with the request URL and the `user_data` given to
/// `petfinder_client_new`. On success the host fills `response` and returns
/// `true`; `response->body` must stay valid until the library call that
/// triggered the fetch has returned.
/// Returning `false` reports a connection failure.
pub type FfiFetchFn = extern "C" fn(
    url: *const c_char,
    user_data: *mut c_void,
    response: *mut FfiHttpResponse,
) -> bool;

/// An HTTP response filled in by the host's fetch callback.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

/// `Transport` that calls back into the host.
pub(crate) struct HostTransport {
    pub(crate) fetch: FfiFetchFn,
    pub(crate) user_data: *mut c_void,
}

impl Transport for HostTransport {
    fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let url = CString::new(url).map_err(|e| TransportError::Connection(e.to_string()))?;
        let mut response = FfiHttpResponse {
            status: 0,
            body: std::ptr::null(),
        };
        if !(self.fetch)(url.as_ptr(), self.user_data, &mut response) {
            return Err(TransportError::Connection("host fetch failed".to_string()));
        }

        let body = if response.body.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(response.body) }
                .to_string_lossy()
                .into_owned()
        };
        if !(200..300).contains(&response.status) {
            return Err(TransportError::Status {
                status: response.status,
                body,
            });
        }
        Ok(body)
    }
}

/// Opaque handle to a `Client`. C callers receive a pointer to this and pass
/// it back into every FFI function.
pub struct FfiPetfinderClient {
    pub(crate) inner: Client<HostTransport>,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCallResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Connection = 2,
    InvalidArgument = 3,
    Panic = 4,
    NullArg = 5,
}

/// Result envelope for `petfinder_call`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `body` holds
/// the raw response. On an HTTP error `http_status` is set and `body` holds
/// the error body. Otherwise `body` is null.
#[repr(C)]
pub struct FfiCallResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub body: *mut c_char,
}

impl FfiCallResult {
    pub(crate) fn ok(body: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(body))
    }

    pub(crate) fn from_error(err: TransportError) -> *mut Self {
        let msg = err.to_string();
        match err {
            TransportError::Status { status, body } => {
                Self::boxed(FfiErrorCode::Http, Some(msg), status, Some(body))
            }
            TransportError::Connection(_) => {
                Self::boxed(FfiErrorCode::Connection, Some(msg), 0, None)
            }
        }
    }

    pub(crate) fn invalid_argument(msg: String) -> *mut Self {
        Self::boxed(FfiErrorCode::InvalidArgument, Some(msg), 0, None)
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0, None)
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }

    fn boxed(
        error_code: FfiErrorCode,
        error_message: Option<String>,
        http_status: u16,
        body: Option<String>,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiCallResult {
            error_code,
            error_message: error_message.map_or(std::ptr::null_mut(), into_c_string),
            http_status,
            body: body.map_or(std::ptr::null_mut(), into_c_string),
        }))
    }
}

/// Move `s` into a heap C string owned by the caller. Interior NUL bytes
/// are dropped.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}
