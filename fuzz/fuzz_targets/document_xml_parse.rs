//! Fuzz target for document XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the document reader and
//! writes back whatever parses, checking for panics, crashes, or hangs.

#![no_main]

use imgfind::document::io_xml::{from_document_slice, to_document_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(root) = from_document_slice(data) {
        let _ = to_document_string(&root);
    }
});
