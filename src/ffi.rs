//! C ABI for foreign hosts.
//!
//! Conventions:
//!   - All inputs are NUL-terminated strings owned by the caller for the
//!     duration of the call. A NULL input counts as invalid input.
//!   - String results are allocated here and must be released exactly once
//!     with [`passcrypt_string_free`]. NULL is the failure sentinel.
//!   - No panic unwinds across the boundary.
//!   - Symbols are prefixed `passcrypt_`.

use std::ffi::{CStr, CString, c_char, c_int, c_ulong};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

use crate::crypt::{self, SaltParams};
use crate::scrub::scrub;

/// `passcrypt_crypt_check`: passphrase matches.
pub const PASSCRYPT_MATCH: c_int = 0;
/// `passcrypt_crypt_check`: passphrase does not match.
pub const PASSCRYPT_MISMATCH: c_int = 1;
/// `passcrypt_crypt_check`: invalid input or the hash could not be computed.
pub const PASSCRYPT_ERROR: c_int = -1;

fn catch_ffi<T, F: FnOnce() -> T>(on_panic: T, f: F) -> T {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or(on_panic)
}

/// # Safety
/// `s` must be NULL or point to a NUL-terminated string valid for `'a`.
unsafe fn borrow_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// # Safety
/// `s` must be NULL or point to a NUL-terminated string valid for `'a`.
unsafe fn borrow_bytes<'a>(s: *const c_char) -> Option<&'a [u8]> {
    if s.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(s) }.to_bytes())
}

fn into_raw(s: String) -> *mut c_char {
    CString::new(s).map_or(ptr::null_mut(), CString::into_raw)
}

/// Generates a salt for `prefix` (NULL for the library's preferred method)
/// and cost `count` (0 for the method default).
///
/// # Safety
/// `prefix` must be NULL or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_gensalt(prefix: *const c_char, count: c_ulong) -> *mut c_char {
    catch_ffi(ptr::null_mut(), || {
        let prefix = if prefix.is_null() {
            None
        } else {
            match unsafe { borrow_str(prefix) } {
                Some(p) => Some(p.to_owned()),
                None => return ptr::null_mut(),
            }
        };
        let params = SaltParams::new(prefix, u64::from(count));
        crypt::gensalt_with(&params).map_or(ptr::null_mut(), |salt| into_raw(salt.into_string()))
    })
}

/// Hashes `phrase` with `salt`. Returns NULL if either input is rejected or
/// the library fails.
///
/// # Safety
/// Both arguments must be NULL or valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_crypt(
    salt: *const c_char,
    phrase: *const c_char,
) -> *mut c_char {
    catch_ffi(ptr::null_mut(), || {
        let salt = unsafe { borrow_str(salt) };
        let phrase = unsafe { borrow_bytes(phrase) };
        let (Some(salt), Some(phrase)) = (salt, phrase) else {
            return ptr::null_mut();
        };
        crypt::hash(salt, phrase).map_or(ptr::null_mut(), |record| into_raw(record.into_string()))
    })
}

/// Checks `phrase` against the stored hash `key`.
///
/// Returns [`PASSCRYPT_MATCH`], [`PASSCRYPT_MISMATCH`] or
/// [`PASSCRYPT_ERROR`]; an error is never reported as a mismatch.
///
/// # Safety
/// Both arguments must be NULL or valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_crypt_check(
    key: *const c_char,
    phrase: *const c_char,
) -> c_int {
    catch_ffi(PASSCRYPT_ERROR, || {
        let key = unsafe { borrow_str(key) };
        let phrase = unsafe { borrow_bytes(phrase) };
        let (Some(key), Some(phrase)) = (key, phrase) else {
            return PASSCRYPT_ERROR;
        };
        match crypt::verify(key, phrase) {
            Ok(true) => PASSCRYPT_MATCH,
            Ok(false) => PASSCRYPT_MISMATCH,
            Err(_) => PASSCRYPT_ERROR,
        }
    })
}

/// Nonzero iff `salt` is accepted by this libxcrypt build.
///
/// # Safety
/// `salt` must be NULL or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_checksalt(salt: *const c_char) -> c_int {
    catch_ffi(0, || {
        unsafe { borrow_str(salt) }.is_some_and(crypt::is_valid_salt) as c_int
    })
}

/// Nonzero iff `phrase` is shorter than the library's passphrase limit.
///
/// # Safety
/// `phrase` must be NULL or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_checkphrase(phrase: *const c_char) -> c_int {
    catch_ffi(0, || {
        unsafe { borrow_bytes(phrase) }.is_some_and(crypt::is_passphrase_acceptable) as c_int
    })
}

/// Zeroes `len` bytes at `buf`. NULL or zero length is a no-op.
///
/// # Safety
/// `buf` must be NULL or valid for writes of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_scrub(buf: *mut c_char, len: usize) {
    if buf.is_null() || len == 0 {
        return;
    }
    scrub(unsafe { slice::from_raw_parts_mut(buf.cast::<u8>(), len) });
}

/// Releases a string returned by this library. NULL is a no-op.
///
/// # Safety
/// `s` must be NULL or a pointer returned by `passcrypt_gensalt` or
/// `passcrypt_crypt` that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn passcrypt_string_free(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(s) });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(s: *mut c_char) -> String {
        assert!(!s.is_null());
        let out = unsafe { CStr::from_ptr(s) }.to_str().unwrap().to_owned();
        unsafe { passcrypt_string_free(s) };
        out
    }

    #[test]
    fn gensalt_crypt_check_roundtrip() {
        let prefix = CString::new("$6$").unwrap();
        let salt = unsafe { passcrypt_gensalt(prefix.as_ptr(), 10000) };
        assert!(!salt.is_null());

        let phrase = CString::new("correct horse").unwrap();
        let record = unsafe { passcrypt_crypt(salt, phrase.as_ptr()) };
        unsafe { passcrypt_string_free(salt) };
        let record = CString::new(owned(record)).unwrap();

        let wrong = CString::new("wrong").unwrap();
        assert_eq!(
            unsafe { passcrypt_crypt_check(record.as_ptr(), phrase.as_ptr()) },
            PASSCRYPT_MATCH
        );
        assert_eq!(
            unsafe { passcrypt_crypt_check(record.as_ptr(), wrong.as_ptr()) },
            PASSCRYPT_MISMATCH
        );
    }

    #[test]
    fn crypt_check_error_is_distinct_from_mismatch() {
        let bad = CString::new("*0").unwrap();
        let phrase = CString::new("pw").unwrap();
        assert_eq!(
            unsafe { passcrypt_crypt_check(bad.as_ptr(), phrase.as_ptr()) },
            PASSCRYPT_ERROR
        );
        assert_eq!(
            unsafe { passcrypt_crypt_check(ptr::null(), phrase.as_ptr()) },
            PASSCRYPT_ERROR
        );
    }

    #[test]
    fn null_inputs_yield_null() {
        let phrase = CString::new("pw").unwrap();
        assert!(unsafe { passcrypt_crypt(ptr::null(), phrase.as_ptr()) }.is_null());
        let salt = CString::new("$6$saltstring").unwrap();
        assert!(unsafe { passcrypt_crypt(salt.as_ptr(), ptr::null()) }.is_null());
    }

    #[test]
    fn gensalt_null_prefix_uses_library_default() {
        let salt = owned(unsafe { passcrypt_gensalt(ptr::null(), 0) });
        assert!(salt.starts_with('$'));
    }

    #[test]
    fn gensalt_unknown_prefix_is_null() {
        let prefix = CString::new("$unknown$").unwrap();
        assert!(unsafe { passcrypt_gensalt(prefix.as_ptr(), 0) }.is_null());
    }

    #[test]
    fn checksalt_and_checkphrase() {
        let good = CString::new("$6$saltstring").unwrap();
        let bad = CString::new("*0").unwrap();
        assert_ne!(unsafe { passcrypt_checksalt(good.as_ptr()) }, 0);
        assert_eq!(unsafe { passcrypt_checksalt(bad.as_ptr()) }, 0);
        assert_eq!(unsafe { passcrypt_checksalt(ptr::null()) }, 0);

        let short = CString::new("pw").unwrap();
        let long = CString::new(vec![b'a'; crypt::MAX_PASSPHRASE_SIZE]).unwrap();
        assert_ne!(unsafe { passcrypt_checkphrase(short.as_ptr()) }, 0);
        assert_eq!(unsafe { passcrypt_checkphrase(long.as_ptr()) }, 0);
    }

    #[test]
    fn scrub_zeroes_buffer() {
        let mut buf = *b"hunter2\0";
        unsafe { passcrypt_scrub(buf.as_mut_ptr().cast(), buf.len()) };
        assert_eq!(buf, [0u8; 8]);
        unsafe { passcrypt_scrub(ptr::null_mut(), 8) };
    }

    #[test]
    fn string_free_accepts_null() {
        unsafe { passcrypt_string_free(ptr::null_mut()) };
    }
}
