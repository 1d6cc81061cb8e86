//! Version command implementation

use crate::environment::Environment;
use crate::error::Result;

/// Run version command
pub fn run(env: &Environment) -> Result<()> {
    println!("ciqw {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!();
    println!("Environment:");
    println!("  Config file: {}", env.config_path.display());
    println!("  Download service: {}", env.base_url);
    println!("  Vendor data: {}", env.garmin_root().display());

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
