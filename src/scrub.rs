//! Zeroing of buffers that held passphrases or hashing state.
//!
//! Writes go through [`zeroize`], which uses volatile stores and a compiler
//! fence so the optimizer cannot drop them as dead. That is still not a
//! guarantee that no copy survives: registers, swapped pages and earlier
//! moves of the value are out of reach.

use zeroize::Zeroize;

/// Overwrites every byte of `buf` with zero.
pub fn scrub(buf: &mut [u8]) {
    buf.zeroize();
}
