//! Stamps `BUILD_DATE` for the summary banner.
//!
//! `SOURCE_DATE_EPOCH` pins the stamp so a rebuild of the same sources
//! prints the same banner.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let stamp = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|secs| secs.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(chrono::Utc::now);

    println!(
        "cargo:rustc-env=BUILD_DATE={}",
        stamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
