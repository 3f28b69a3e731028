//! Reads libxcrypt's buffer limits out of the installed `<crypt.h>`.
//!
//! The probe file is only run through the C preprocessor; each
//! `passcrypt_limit "NAME" VALUE` triple it yields becomes a `pub const` in
//! `$OUT_DIR/crypt_limits.rs`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

const PROBE: &str = "src/sys/limits.c";
include!("build/limits.rs");

fn main() {
    println!("cargo:rerun-if-changed={PROBE}");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build/limits.rs");
    println!("cargo:rustc-link-lib=crypt");

    // -P drops line markers, which GCC otherwise inserts between the marker
    // and a value coming from a system-header macro.
    let expanded = cc::Build::new().file(PROBE).flag("-P").expand();
    let expanded = String::from_utf8_lossy(&expanded);
    let found = scan_limits(&expanded);

    if found.is_empty() {
        panic!("no {MARKER} entries in the preprocessed probe; output was:\n{expanded}");
    }

    let mut out = String::from("// Generated by build.rs from <crypt.h>.\n");
    for name in LIMITS {
        let Some((_, value)) = found.iter().find(|(n, _)| n == name) else {
            panic!("{name} missing from the preprocessed probe; is this libxcrypt's <crypt.h>?");
        };
        writeln!(out, "pub const {name}: usize = {value};").expect("write to String");
    }

    let dest = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR set by cargo"))
        .join("crypt_limits.rs");
    fs::write(&dest, out).expect("failed to write crypt_limits.rs");
}
