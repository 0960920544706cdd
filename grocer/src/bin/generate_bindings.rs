//! Generate UniFFI Swift and Kotlin bindings for Grocer
//!
//! Run: cargo run --bin generate-bindings
//!
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │ DEPENDENCY MAP - Output paths must match the mobile shells                  │
//! │                                                                             │
//! │ Inputs:                                                                     │
//! │   target/release/libgrocer.{so,dylib}  ← Built library for bindgen          │
//! │                                                                             │
//! │ Outputs:                                                                    │
//! │   bindings/swift/grocer.swift          ← Swift bindings                     │
//! │   bindings/swift/grocerFFI.h           ← C header                           │
//! │   bindings/swift/module.modulemap      ← Clang module map                   │
//! │   bindings/kotlin/uniffi/grocer/grocer.kt ← Kotlin bindings                 │
//! └─────────────────────────────────────────────────────────────────────────────┘

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let rust_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = rust_dir.parent().expect("No parent directory");
    let out_dir = rust_dir.join("bindings");

    println!("Building Rust library...");
    run_cmd("cargo", &["build", "--release", "-p", "grocer"], workspace_root);

    let library = library_path(workspace_root);
    let library_arg = library.to_string_lossy().to_string();

    for language in ["swift", "kotlin"] {
        println!("Generating {} bindings...", language);
        let dest = out_dir.join(language);
        fs::create_dir_all(&dest).expect("Create bindings directory");
        run_cmd(
            "cargo",
            &[
                "run",
                "-p",
                "grocer",
                "--bin",
                "uniffi-bindgen",
                "generate",
                "--library",
                &library_arg,
                "--language",
                language,
                "--out-dir",
                &dest.to_string_lossy(),
            ],
            workspace_root,
        );
    }

    // Swift packages expect the FFI module under a stable name
    let swift_dir = out_dir.join("swift");
    let generated_map = swift_dir.join("grocerFFI.modulemap");
    if generated_map.exists() {
        fs::rename(&generated_map, swift_dir.join("module.modulemap")).expect("Rename modulemap");
    }

    println!("Done! Bindings regenerated successfully.");
    println!("  - {}", swift_dir.display());
    println!("  - {}", out_dir.join("kotlin").display());
}

fn library_path(workspace_root: &Path) -> PathBuf {
    let release = workspace_root.join("target/release");
    let name = if cfg!(target_os = "macos") {
        "libgrocer.dylib"
    } else {
        "libgrocer.so"
    };
    release.join(name)
}

fn run_cmd(program: &str, args: &[&str], dir: &Path) {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap_or_else(|e| panic!("Failed to run {}: {}", program, e));

    if !status.success() {
        panic!("{} failed with status: {}", program, status);
    }
}
