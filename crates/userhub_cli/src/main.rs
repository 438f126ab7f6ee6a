//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `userhub_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // A tiny probe keeps core crate wiring verifiable without any
    // transport or persistence setup.
    println!("userhub_core ping={}", userhub_core::ping());
    println!("userhub_core version={}", userhub_core::core_version());
}
