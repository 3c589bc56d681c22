// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Generates `env_names.rs`: one documented `&str` constant per environment
//! variable the daemon reads.

use std::io::Write;

const VARS: &[(&str, &str)] = &[
    ("SITELINE_CONFIG", "path to the TOML config file."),
    ("SITELINE_BIND", "socket address the HTTP server binds to."),
    ("SITELINE_DB", "path of the SQLite database file."),
    ("SITELINE_STATE_DIR", "override the siteline state directory."),
    ("SITELINE_API_TOKEN", "bearer token required by the API."),
    ("XDG_STATE_HOME", "XDG base directory for state data."),
    (
        "RUST_LOG",
        "controls log level filtering (used by tracing-subscriber).",
    ),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::fs::File::create(path)?;

    for (i, (name, doc)) in VARS.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        writeln!(f, "/// Environment variable: {doc}")?;
        writeln!(f, "pub const {name}: &str = \"{name}\";")?;
    }

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
