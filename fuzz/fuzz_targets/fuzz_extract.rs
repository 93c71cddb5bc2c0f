#![no_main]
use libfuzzer_sys::fuzz_target;

use form_extract::extract;

fuzz_target!(|data: &[u8]| {
    // Any structured error is fine; the extractor must never panic.
    let _ = extract(data, "multipart/form-data; boundary=BOUNDARY", "file");
});
