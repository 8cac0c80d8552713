fn main() {
    println!("cargo:rerun-if-changed=c/rill_runtime.c");
    println!("cargo:rerun-if-changed=c/rill_runtime.h");
    cc::Build::new()
        .file("c/rill_runtime.c")
        .include("c")
        .warnings(true)
        .compile("rill_runtime_c");
}
