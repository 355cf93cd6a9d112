
/// Number of cases per property: more on CI, very few under Miri.
#[cfg(not(any(miri, feature = "test-fast")))]
fn quickcheck_tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

#[cfg(any(miri, feature = "test-fast"))]
fn quickcheck_tests() -> u64 {
    10
}
