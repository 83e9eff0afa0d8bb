// build.rs

use chrono::Utc;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let version = env::var("CARGO_PKG_VERSION").unwrap();

    // Picked up by lib.rs through include!()
    fs::write(
        &dest_path,
        format!(
            "pub const BUILD_DATE: &str = \"{date}\";\npub const LONG_VERSION: &str = \"{version} (built {date})\";\n",
            date = build_date,
            version = version,
        ),
    ).unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
