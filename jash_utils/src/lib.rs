pub mod macros;
pub mod serde;

/// Returns the version of this build.
///
/// Release builds set `JASH_VERSION` at compile time; local builds fall back
/// to the crate version.
pub const fn jash_version() -> &'static str {
    match option_env!("JASH_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}
