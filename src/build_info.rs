//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `loop-predictor 0.1.0 (2026-10-17 abc1234)`
pub fn version_line() -> String {
    format!(
        "loop-predictor {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}
