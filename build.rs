// build.rs
fn main() {
    // Embedded migrations are compiled into the binary; rebuild when they change.
    println!("cargo:rerun-if-changed=migrations");
}
