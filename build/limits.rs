// Shared by build.rs and tests/limits_scan.rs.

const MARKER: &str = "passcrypt_limit";

const LIMITS: &[&str] = &[
    "CRYPT_OUTPUT_SIZE",
    "CRYPT_MAX_PASSPHRASE_SIZE",
    "CRYPT_GENSALT_OUTPUT_SIZE",
    "CRYPT_DATA_RESERVED_SIZE",
    "CRYPT_DATA_INTERNAL_SIZE",
];

fn parse_value(raw: &str) -> Option<usize> {
    let trimmed = raw
        .trim_matches(|c| c == '(' || c == ')')
        .trim_end_matches(['u', 'U', 'l', 'L']);
    trimmed.parse().ok()
}

/// Collects `passcrypt_limit "NAME" VALUE` triples from preprocessor output.
///
/// Matches on the token stream rather than per line: directive lines are
/// dropped and the rest is joined, so a triple split across lines is still
/// found.
fn scan_limits(expanded: &str) -> Vec<(&str, usize)> {
    let tokens: Vec<&str> = expanded
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .collect();

    let mut found = Vec::with_capacity(LIMITS.len());
    for window in tokens.windows(3) {
        let &[marker, name, value] = window else {
            continue;
        };
        if marker != MARKER {
            continue;
        }
        let name = name.trim_matches('"');
        if !LIMITS.contains(&name) {
            continue;
        }
        match parse_value(value) {
            Some(v) => found.push((name, v)),
            None => panic!("{name} in <crypt.h> is not an integer literal: {value}"),
        }
    }
    found
}
