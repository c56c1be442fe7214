//! C-ABI wrapper around `petfinder-core`.
//!
//! # Overview
//! Exposes the Petfinder client through `extern "C"` functions so any
//! language with a C FFI can drive it. The host performs the HTTP GETs
//! through a fetch callback; the library builds URLs, signs and bootstraps
//! the session token, and keeps the last request.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Operations are addressed by their dotted remote name and take
//!   parallel `keys` / `values` arrays, so one entry point covers all of them.
//! - The C caller owns all returned pointers and must call the matching
//!   `petfinder_free_*` function to release them.
//! - A client handle must not be used from two threads at once.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use petfinder_core::{Client, ClientConfig, Operation, Params};

use types::*;

/// Borrow a C string as `&str`, or `None` if it is not valid UTF-8.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client.
///
/// `api_secret` may be null; it is only needed for `auth.getToken`.
/// `base_url` may be null for the public Petfinder endpoint.
/// Returns null if `api_key` or `fetch` is null, if any string is not valid
/// UTF-8, or if an internal panic occurs. The caller must free the returned pointer with
/// `petfinder_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_client_new(
    api_key: *const c_char,
    api_secret: *const c_char,
    base_url: *const c_char,
    fetch: Option<FfiFetchFn>,
    user_data: *mut c_void,
) -> *mut FfiPetfinderClient {
    catch_unwind(|| {
        let Some(fetch) = fetch else {
            return std::ptr::null_mut();
        };
        if api_key.is_null() {
            return std::ptr::null_mut();
        }
        let Some(key) = (unsafe { borrow_str(api_key) }) else {
            return std::ptr::null_mut();
        };
        let secret = if api_secret.is_null() {
            None
        } else {
            match unsafe { borrow_str(api_secret) } {
                Some(secret) => Some(secret),
                None => return std::ptr::null_mut(),
            }
        };
        let mut config = ClientConfig::new(key, secret);
        if !base_url.is_null() {
            let Some(base_url) = (unsafe { borrow_str(base_url) }) else {
                return std::ptr::null_mut();
            };
            config.base_url = base_url.to_string();
        }
        let client = Client::with_transport(config, HostTransport { fetch, user_data });
        Box::into_raw(Box::new(FfiPetfinderClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `petfinder_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_client_free(client: *mut FfiPetfinderClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Configuration and session state
// ---------------------------------------------------------------------------

/// Set the response format to `"json"` or `"xml"`.
///
/// Returns false for any other value (the format is left unchanged), a
/// null argument or invalid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_set_response_format(
    client: *mut FfiPetfinderClient,
    format: *const c_char,
) -> bool {
    catch_unwind(|| {
        if client.is_null() || format.is_null() {
            return false;
        }
        let client = unsafe { &mut *client };
        match unsafe { borrow_str(format) } {
            Some(format) => client.inner.set_response_format(format).is_ok(),
            None => false,
        }
    })
    .unwrap_or(false)
}

/// The current response format. Free with `petfinder_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_response_format(client: *const FfiPetfinderClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        into_c_string(client.inner.response_format().to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Overwrite the session token. Returns false for null arguments or a
/// token that is not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_set_token(
    client: *mut FfiPetfinderClient,
    token: *const c_char,
) -> bool {
    catch_unwind(|| {
        if client.is_null() || token.is_null() {
            return false;
        }
        let Some(token) = (unsafe { borrow_str(token) }) else {
            return false;
        };
        let client = unsafe { &mut *client };
        client.inner.set_token(token);
        true
    })
    .unwrap_or(false)
}

/// The session token, or null if none is held. Free with
/// `petfinder_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_token(client: *const FfiPetfinderClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        client
            .inner
            .token()
            .map_or(std::ptr::null_mut(), |t| into_c_string(t.to_string()))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The URL of the most recent request, or null before the first call.
/// Free with `petfinder_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_last_request(client: *const FfiPetfinderClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        client
            .inner
            .last_request()
            .map_or(std::ptr::null_mut(), |r| into_c_string(r.to_string()))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Make `operation` (dotted name, e.g. `"pet.find"`) carry a session token,
/// fetched on first use.
///
/// Returns false for unknown operations, for `auth.getToken`, and for null
/// arguments.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_require_token(
    client: *mut FfiPetfinderClient,
    operation: *const c_char,
) -> bool {
    catch_unwind(|| {
        if client.is_null() || operation.is_null() {
            return false;
        }
        let client = unsafe { &mut *client };
        match unsafe { borrow_str(operation) }.map(str::parse::<Operation>) {
            Some(Ok(op)) => client.inner.require_token(op),
            _ => false,
        }
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Run `operation` with `len` parameters taken pairwise from `keys` and
/// `values`.
///
/// `keys` and `values` may be null when `len` is 0. Strings that are not
/// valid UTF-8 are rejected with `InvalidArgument`. `auth.getToken` is
/// signed automatically. Always returns a result; free it with
/// `petfinder_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_call(
    client: *mut FfiPetfinderClient,
    operation: *const c_char,
    keys: *const *const c_char,
    values: *const *const c_char,
    len: u32,
) -> *mut FfiCallResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCallResult::null_arg("client");
        }
        if operation.is_null() {
            return FfiCallResult::null_arg("operation");
        }
        if len > 0 && (keys.is_null() || values.is_null()) {
            return FfiCallResult::null_arg("keys/values");
        }
        let client = unsafe { &mut *client };
        let Some(operation) = (unsafe { borrow_str(operation) }) else {
            return FfiCallResult::invalid_argument("operation is not valid UTF-8".to_string());
        };
        let op = match operation.parse::<Operation>() {
            Ok(op) => op,
            Err(e) => return FfiCallResult::invalid_argument(e.to_string()),
        };

        let mut params = Params::new();
        for i in 0..len as usize {
            let (key, value) = unsafe { (*keys.add(i), *values.add(i)) };
            if key.is_null() || value.is_null() {
                return FfiCallResult::null_arg("parameter");
            }
            let (Some(key), Some(value)) = (unsafe { borrow_str(key) }, unsafe { borrow_str(value) })
            else {
                return FfiCallResult::invalid_argument(format!("parameter {i} is not valid UTF-8"));
            };
            params.insert(key, value);
        }

        match client.inner.request(op, params) {
            Ok(body) => FfiCallResult::ok(body),
            Err(e) => FfiCallResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCallResult::panic("panic in petfinder_call"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiCallResult` returned by `petfinder_call`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_free_result(result: *mut FfiCallResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.body.is_null() {
            drop(unsafe { CString::from_raw(result.body) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn petfinder_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
