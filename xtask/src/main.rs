//! Custom cargo commands for iamlens.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check (test + clippy)
//!   cargo xtask bench     - Run benchmarks
//!   cargo xtask fuzz [s]  - Run every fuzz target for `s` seconds (default 30)

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

const FUZZ_TARGETS: &[&str] = &["token_decode", "substring_match", "dataset_load"];

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let task = args.next();
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        Some("fuzz") => {
            let seconds = match args.next() {
                Some(s) => s.parse().with_context(|| format!("invalid duration {:?}", s))?,
                None => 30,
            };
            fuzz(seconds)?
        }
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run full verification suite (tests in both feature sets + clippy + markers)
  test      Run all Rust tests
  check     Quick check (cargo test + clippy)
  bench     Run benchmarks
  fuzz [s]  Run each fuzz target for s seconds (needs cargo-fuzz, nightly)
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("iamlens Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Checking invariant markers...");
    check_invariant_markers()?;
    println!("✓ Invariant markers present\n");

    println!("[2/4] Running tests (default features)...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ Tests passed\n");

    println!("[3/4] Running tests (no parallel feature)...");
    run_cargo(&["test", "--quiet", "--no-default-features"])?;
    println!("✓ Tests passed without rayon\n");

    println!("[4/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/2] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[2/2] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

/// Run every fuzz target for a fixed time budget.
fn fuzz(seconds: u64) -> Result<()> {
    let root = project_root()?;
    let max_time = format!("-max_total_time={}", seconds);

    for (n, target) in FUZZ_TARGETS.iter().enumerate() {
        println!("[{}/{}] fuzzing {} for {}s...", n + 1, FUZZ_TARGETS.len(), target, seconds);
        let status = Command::new("cargo")
            .args(["+nightly", "fuzz", "run", *target, "--", max_time.as_str()])
            .current_dir(&root)
            .status()
            .context("Failed to run cargo fuzz (is cargo-fuzz installed?)")?;

        if !status.success() {
            bail!("fuzz target {} failed", target);
        }
    }

    println!("\n✓ No crashes");
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("no current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

/// Each module that documents an INVARIANTS section must keep it.
fn check_invariant_markers() -> Result<()> {
    let root = project_root()?;
    let required = ["src/index/mod.rs", "src/types.rs"];

    for path in required {
        let content = std::fs::read_to_string(root.join(path))
            .with_context(|| format!("Failed to read {}", path))?;
        if !content.to_lowercase().contains("# invariants") {
            bail!(
                "{} lost its INVARIANTS section. Someone may have removed safety comments!",
                path
            );
        }
    }

    Ok(())
}
