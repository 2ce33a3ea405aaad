fn main() {
    // libgit2 on Windows needs the advapi32 system library at link time
    if std::env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows") {
        println!("cargo:rustc-link-lib=advapi32");
    }
}
