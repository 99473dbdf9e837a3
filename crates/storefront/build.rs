//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so templates can link an immutable,
//! content-addressed URL.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

const STYLESHEET: &str = "static/css/main.css";
const DERIVED_DIR: &str = "static/css/derived";

fn main() {
    fingerprint_stylesheet();
}

/// Hash `main.css`, publish the short hash as `CSS_HASH`, and write a
/// `main.<hash>.css` copy into the derived directory.
fn fingerprint_stylesheet() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let root = Path::new(&manifest_dir);
    let css_path = root.join(STYLESHEET);

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = match fs::read(&css_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {STYLESHEET}: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash: String = digest.chars().take(8).collect();
    println!("cargo:rustc-env=CSS_HASH={short_hash}");

    let derived_dir = root.join(DERIVED_DIR);
    fs::create_dir_all(&derived_dir).expect("Failed to create derived CSS directory");

    // Drop fingerprints from earlier builds so the directory only holds the current one.
    if let Ok(entries) = fs::read_dir(&derived_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("main.") && name.ends_with(".css") {
                let _ = fs::remove_file(entry.path());
            }
        }
    }

    let derived_path = derived_dir.join(format!("main.{short_hash}.css"));
    fs::copy(&css_path, &derived_path).expect("Failed to copy CSS to derived directory");
}
