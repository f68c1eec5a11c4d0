//! Build script: parse `.tl` schema files and generate Rust source code.
//!
//! Adding a layer means appending a `---layer N---` section to a schema file
//! and bumping its `// LAYER N` header; the rest is automatic.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tlcodec_gen::{Config, Outputs, generate};
use tlcodec_parser::{declared_layer, parse_tl_file, tl::Definition};

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");

    // ── Collect schema files ────────────────────────────────────────────────
    let mut all_defs: Vec<Definition> = Vec::new();
    let mut layer: i32 = 0;

    let schemas: &[(&str, bool)] = &[
        ("tl/core.tl", cfg!(feature = "tl-core")),
        ("tl/chat.tl", cfg!(feature = "tl-chat")),
        ("tl/user.tl", cfg!(feature = "tl-user")),
    ];

    for (path, enabled) in schemas {
        if !enabled {
            continue;
        }

        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Cannot read {path}: {e}"));

        // Cargo rebuild trigger
        println!("cargo:rerun-if-changed={path}");

        if let Some(n) = declared_layer(&content) {
            layer = layer.max(n);
        }

        for result in parse_tl_file(&content) {
            match result {
                Ok(def) => {
                    layer = layer.max(def.layer);
                    all_defs.push(def);
                }
                Err(e) => println!("cargo:warning=TL parse error in {path}: {e}"),
            }
        }
    }

    // ── Build config from features ──────────────────────────────────────────
    let config = Config {
        gen_name_for_id: cfg!(feature = "name-for-id"),
    };

    // ── Generate code ───────────────────────────────────────────────────────
    let mut outputs = Outputs::from_dir(&out_dir)?;
    generate(&all_defs, &config, &mut outputs)?;
    outputs.flush()?;

    // Patch the LAYER constant into generated_common.rs
    let common_path = PathBuf::from(&out_dir).join("generated_common.rs");
    let common = fs::read_to_string(&common_path)?;
    let patched = common.replace(
        "pub const LAYER: i32 = 0; // update via build.rs",
        &format!("pub const LAYER: i32 = {layer};"),
    );
    fs::write(&common_path, patched)?;

    io::stdout().flush()
}
