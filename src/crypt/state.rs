//! Per-call scratch space for `crypt_rn`.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::io;

use tracing::warn;

use crate::error::{Error, Result};
use crate::scrub::scrub;
use crate::sys::{
    self, CRYPT_DATA_INTERNAL_SIZE, CRYPT_DATA_RESERVED_SIZE, CRYPT_MAX_PASSPHRASE_SIZE,
    CRYPT_OUTPUT_SIZE,
};

/// Layout-compatible with libxcrypt's `struct crypt_data`.
///
/// One value per computation, never shared. Every region is zeroed on
/// construction, before each [`load`](Self::load), after each
/// [`compute`](Self::compute) and on drop.
#[repr(C)]
pub(crate) struct ComputationState {
    output: [u8; CRYPT_OUTPUT_SIZE],
    setting: [u8; CRYPT_OUTPUT_SIZE],
    input: [u8; CRYPT_MAX_PASSPHRASE_SIZE],
    reserved: [u8; CRYPT_DATA_RESERVED_SIZE],
    initialized: u8,
    internal: [u8; CRYPT_DATA_INTERNAL_SIZE],
}

const STATE_SIZE: usize = size_of::<ComputationState>();
const _: () = assert!(STATE_SIZE <= c_int::MAX as usize);

/// Copies as much of `src` as fits in `dst` while leaving room for the
/// terminating NUL, then terminates. Returns the number of bytes copied.
pub(crate) fn copy_truncated(dst: &mut [u8], src: &[u8]) -> usize {
    let Some(room) = dst.len().checked_sub(1) else {
        return 0;
    };
    let n = src.len().min(room);
    dst[..n].copy_from_slice(&src[..n]);
    dst[n] = 0;
    n
}

impl ComputationState {
    pub(crate) fn new() -> Self {
        Self {
            output: [0; CRYPT_OUTPUT_SIZE],
            setting: [0; CRYPT_OUTPUT_SIZE],
            input: [0; CRYPT_MAX_PASSPHRASE_SIZE],
            reserved: [0; CRYPT_DATA_RESERVED_SIZE],
            initialized: 0,
            internal: [0; CRYPT_DATA_INTERNAL_SIZE],
        }
    }

    pub(crate) fn scrub(&mut self) {
        scrub(&mut self.output);
        scrub(&mut self.setting);
        scrub(&mut self.input);
        scrub(&mut self.reserved);
        scrub(std::slice::from_mut(&mut self.initialized));
        scrub(&mut self.internal);
    }

    /// Zeroes the state, then places `setting` and `phrase` in their regions.
    /// Inputs longer than a region are truncated, never overflowed; callers
    /// validate lengths beforehand so truncation does not occur in practice.
    pub(crate) fn load(&mut self, setting: &[u8], phrase: &[u8]) {
        self.scrub();
        copy_truncated(&mut self.setting, setting);
        copy_truncated(&mut self.input, phrase);
    }

    /// Runs `crypt_rn` over the loaded regions and copies the result out.
    ///
    /// The state is scrubbed before returning, on success and failure alike.
    pub(crate) fn compute(&mut self) -> Result<String> {
        let result = self.run();
        self.scrub();
        result
    }

    fn run(&mut self) -> Result<String> {
        let data: *mut Self = self;
        // SAFETY: `data` points to a live, exclusively borrowed state of
        // STATE_SIZE bytes. `setting` and `input` are NUL-terminated by
        // `load`, and libxcrypt permits passing them back as arguments.
        let raw = unsafe {
            let phrase = (&raw const (*data).input).cast::<c_char>();
            let setting = (&raw const (*data).setting).cast::<c_char>();
            sys::crypt_rn(phrase, setting, data.cast::<c_void>(), STATE_SIZE as c_int)
        };

        if raw.is_null() {
            let err = io::Error::last_os_error();
            warn!(error = %err, "crypt_rn reported failure");
            return Err(Error::HashComputation(err));
        }

        // SAFETY: a non-NULL result points into `self.output`, NUL-terminated.
        let bytes = unsafe { CStr::from_ptr(raw) }.to_bytes();
        if bytes.is_empty() || bytes[0] == b'*' {
            warn!("crypt_rn returned a failure token");
            return Err(Error::HashComputation(io::Error::new(
                io::ErrorKind::InvalidData,
                "library returned a failure token",
            )));
        }

        let record = std::str::from_utf8(bytes).map_err(|e| {
            Error::HashComputation(io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        Ok(record.to_owned())
    }

    #[cfg(test)]
    pub(crate) fn is_scrubbed(&self) -> bool {
        self.output.iter().all(|&b| b == 0)
            && self.setting.iter().all(|&b| b == 0)
            && self.input.iter().all(|&b| b == 0)
            && self.reserved.iter().all(|&b| b == 0)
            && self.initialized == 0
            && self.internal.iter().all(|&b| b == 0)
    }

    #[cfg(test)]
    pub(crate) fn setting(&self) -> &[u8] {
        &self.setting
    }

    #[cfg(test)]
    pub(crate) fn input(&self) -> &[u8] {
        &self.input
    }
}

impl Drop for ComputationState {
    fn drop(&mut self) {
        self.scrub();
    }
}
