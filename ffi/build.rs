fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("PETFINDER_H")
        .generate();

    match generated {
        Ok(bindings) => {
            bindings.write_to_file(format!("{crate_dir}/include/petfinder.h"));
        }
        Err(err) => println!("cargo:warning=petfinder.h not generated: {err}"),
    }
}
