use proptest::prelude::*;

/// Short cause text, blank about a third of the time.
pub fn arb_cause() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
        4 => "[A-Za-z][A-Za-z ]{0,15}",
    ]
}

/// Non-blank cause text.
pub fn arb_filled_cause() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}"
}

/// Empty or whitespace-only text.
pub fn arb_blank_cause() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[ \t]{1,4}"]
}

pub fn arb_causes(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_cause(), 1..=max)
}

/// One chain as (initial cause, steps).
pub fn arb_chain() -> impl Strategy<Value = (String, Vec<String>)> {
    (arb_cause(), prop::collection::vec(arb_cause(), 0..6))
}
