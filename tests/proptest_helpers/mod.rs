#![allow(dead_code)]

use imgfind::resolve::SizeDirective;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Image side lengths small enough to keep arithmetic exact but varied.
pub fn arb_side() -> impl Strategy<Value = u32> {
    1u32..=4096
}

/// Target box sides, 0 meaning unconstrained.
pub fn arb_target() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), 1u32..=8192]
}

pub fn arb_basename() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,16}"
}

pub fn arb_directive() -> impl Strategy<Value = SizeDirective> {
    prop_oneof![
        Just(SizeDirective::None),
        (1u32..=100_000).prop_map(SizeDirective::Width),
        (1u32..=100_000).prop_map(SizeDirective::Height),
        (1u32..=100_000, 1u32..=100_000).prop_map(|(w, h)| SizeDirective::Both(w, h)),
    ]
}
