#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Scanning and validation must never panic on arbitrary input
        if let Ok(placeholders) = grokrs::syntax::placeholders(text) {
            for p in placeholders {
                assert_eq!(&text[p.span.clone()], p.text);
            }
        }
    }
});
