//! Build script for grabber-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates machine.toml, then embeds it as postcard bytes

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use grabber_core::config::MachineConfig;
use grabber_core::grab::final_position;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    setup_linker(&out_dir);
    embed_config(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse machine.toml, validate it and write machine.bin for the firmware
fn embed_config(out_dir: &Path) {
    // Re-run if machine.toml changes
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a machine.toml configuration file.        ║\n\
            ║  Please create one in the grabber-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse into the same types the firmware uses
    let config: MachineConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid machine.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid machine configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║  • {:<62} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            e.to_string()
        );
    }

    let bytes = postcard::to_allocvec(&config).expect("config serializes");
    let mut f = File::create(out_dir.join("machine.bin")).unwrap();
    f.write_all(&bytes).unwrap();

    if let Some(end) = final_position(&config.cycle.steps) {
        println!(
            "cargo:warning=machine.toml validated: {} steps x {}, cycle ends at ({}, {})",
            config.cycle.steps.len(),
            config.cycle.repeat_count,
            end.x,
            end.z
        );
    } else {
        println!("cargo:warning=machine.toml validated: cycle has no moves");
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
