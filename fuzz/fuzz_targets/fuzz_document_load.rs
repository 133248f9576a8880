#![no_main]

use formloom_model::FormDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = FormDocument::from_json_str(text) else {
        return;
    };

    // Anything that loads must validate and survive a save/load cycle.
    assert!(document.validate().is_ok());
    let saved = document.to_json_string();
    let reloaded = FormDocument::from_json_str(&saved).expect("saved document reloads");
    assert_eq!(reloaded, document);
    assert_eq!(reloaded.state_hash(), document.state_hash());
});
