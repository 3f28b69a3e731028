include!("../build/limits.rs");

#[test]
fn reads_values_on_the_same_line() {
    let out = "passcrypt_limit \"CRYPT_OUTPUT_SIZE\" 384\n\
               passcrypt_limit \"CRYPT_MAX_PASSPHRASE_SIZE\" 512\n";
    assert_eq!(
        scan_limits(out),
        vec![("CRYPT_OUTPUT_SIZE", 384), ("CRYPT_MAX_PASSPHRASE_SIZE", 512)]
    );
}

#[test]
fn reads_values_split_by_line_markers() {
    // GCC without -P moves a value that comes from a system-header macro
    // onto its own line behind a line marker
    let out = "# 9 \"src/sys/limits.c\"\n\
               passcrypt_limit \"CRYPT_DATA_INTERNAL_SIZE\"\n\
               # 9 \"src/sys/limits.c\" 3 4\n\
               30720\n\
               # 9 \"src/sys/limits.c\"\n";
    assert_eq!(scan_limits(out), vec![("CRYPT_DATA_INTERNAL_SIZE", 30720)]);
}

#[test]
fn accepts_parenthesised_and_suffixed_values() {
    let out = "passcrypt_limit \"CRYPT_OUTPUT_SIZE\" (384)\n\
               passcrypt_limit \"CRYPT_GENSALT_OUTPUT_SIZE\" 192U\n";
    assert_eq!(
        scan_limits(out),
        vec![("CRYPT_OUTPUT_SIZE", 384), ("CRYPT_GENSALT_OUTPUT_SIZE", 192)]
    );
}

#[test]
fn ignores_unknown_names_and_other_declarations() {
    let out = "extern char *crypt (const char *__phrase, const char *__salt);\n\
               passcrypt_limit \"SOMETHING_ELSE\" 7\n";
    assert!(scan_limits(out).is_empty());
}

#[test]
fn empty_output_finds_nothing() {
    assert!(scan_limits("").is_empty());
    assert_eq!(LIMITS.len(), 5);
    assert_eq!(MARKER, "passcrypt_limit");
}
