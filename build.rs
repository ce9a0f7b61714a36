use std::{env, fs::File, io::Write, path::Path};

// Protocol version announced in the `version` handshake. Peers compare it by
// convention only, the envelope itself carries no version field.
const NODE_VERSION: i64 = 1;

fn main() {
    write_node_version_to_constants();
}

// The version is baked in at compile time so a node and its wallets built from
// the same tree always agree on it. A build for a network running a different
// protocol revision can override it:
// NODE_VERSION=2 cargo build

fn write_node_version_to_constants() {
    let out_dir = env::var("OUT_DIR").expect("No out dir");
    let dest_path = Path::new(&out_dir).join("constants.rs");
    let node_version = env::var("NODE_VERSION").ok();
    let node_version = node_version
        .as_deref()
        .map_or(Ok(NODE_VERSION), str::parse)
        .expect("Could not parse NODE_VERSION");
    let mut f = File::create(&dest_path).expect("Could not create file");
    write!(&mut f, "pub const NODE_VERSION: i64 = {};", node_version).expect("Could not write file");
    println!("cargo:rerun-if-env-changed=NODE_VERSION");
}
