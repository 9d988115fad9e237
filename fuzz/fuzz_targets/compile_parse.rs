#![no_main]

use std::sync::LazyLock;

use grokrs::Grok;
use libfuzzer_sys::fuzz_target;

static GROK: LazyLock<Option<Grok>> = LazyLock::new(|| Grok::new().ok());

fuzz_target!(|data: &[u8]| {
    let Some(grok) = GROK.as_ref() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the pattern, the rest is matched against it
    let (pattern, input) = text.split_once('\n').unwrap_or((text, ""));
    if let Ok(compiled) = grok.compile(pattern) {
        let _ = compiled.parse(input);
        let _ = compiled.parse_to_multi_map(input);
        let _ = compiled.parse_typed(input);
    }
});
