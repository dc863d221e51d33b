//! Compile-time build information stamped by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string used by `--version` and the title screen.
pub fn version_line() -> String {
    format!(
        "mkultra {} ({} {}, {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT,
        BUILD_PROFILE
    )
}
