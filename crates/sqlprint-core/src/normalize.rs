// SPDX-License-Identifier: Apache-2.0

/// Collapses every run of whitespace (line breaks included) into a single
/// space and drops leading and trailing whitespace.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            // Nothing emitted yet means we are still in leading whitespace.
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }

    out
}
