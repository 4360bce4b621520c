use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=TUNCAP_GIT_TAG");

    let pkg_version = env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let build_version = env::var("TUNCAP_GIT_TAG")
        .ok()
        .map(|tag| tag.trim().trim_start_matches('v').to_string())
        .filter(|tag| !tag.is_empty())
        .unwrap_or(pkg_version);

    // `-V` prints the short form; `--version` adds target and profile.
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let long_version = format!("{build_version} ({target}, {profile})");

    println!("cargo:rustc-env=TUNCAP_BUILD_VERSION={build_version}");
    println!("cargo:rustc-env=TUNCAP_LONG_VERSION={long_version}");
}
