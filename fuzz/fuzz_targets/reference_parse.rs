//! Fuzz target for image reference parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 strings to the `basename[:directive]`
//! parser, checking for panics, crashes, or hangs.

#![no_main]

use imgfind::resolve::fuzz_parse_reference;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_reference(raw);
});
