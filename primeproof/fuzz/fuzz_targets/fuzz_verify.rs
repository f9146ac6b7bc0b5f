#![no_main]

use libfuzzer_sys::fuzz_target;
use primeproof::replace_first;

fuzz_target!(|input: (Vec<u8>, Vec<u8>, Vec<u8>)| {
    let symbol = |b: &u8| (b % 4).to_string();
    let tokens: Vec<String> = input.0.iter().map(symbol).collect();
    let pattern: Vec<String> = input.1.iter().take(4).map(symbol).collect();
    let replacement: Vec<String> = input.2.iter().take(4).map(symbol).collect();

    if let Some(rewritten) = replace_first(&tokens, &pattern, &replacement) {
        assert_eq!(
            rewritten.len() + pattern.len(),
            tokens.len() + replacement.len()
        );
    }
});
