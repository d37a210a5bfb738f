//! Type-descriptor fuzz target: arbitrary strings must parse or fail with
//! `UnsupportedType`, never panic, and accepted sizes must follow the size law.
//! Build with: cargo fuzz run type_descriptor (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    if let Ok(t) = dpgen::types::parse(s) {
        assert_eq!(t.size(), t.width * t.count.unwrap_or(1));
        assert_eq!(dpgen::types::parse(&t.to_string()), Ok(t));
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run type_descriptor");
}
