// Build script: derive the CLI version string from git tags.
//
// Tagged builds report the tag ("v0.2.0" -> "0.2.0"). Untagged builds report
// CARGO_PKG_VERSION plus the abbreviated commit. Without git the package
// version is used unchanged.

use std::process::Command;

fn main() {
    let pkg_version = env!("CARGO_PKG_VERSION");
    let version = describe()
        .map(|described| version_from_describe(&described, pkg_version))
        .unwrap_or_else(|| pkg_version.to_string());

    println!("cargo:rustc-env=CHADSBLED_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let described = String::from_utf8(output.stdout).ok()?;
    Some(described.trim().to_string())
}

fn version_from_describe(described: &str, pkg_version: &str) -> String {
    match described.strip_prefix('v') {
        // "v0.2.0" or "v0.2.0-3-gabc123[-dirty]": keep the tag part only
        Some(tagged) => tagged.split('-').next().unwrap_or(tagged).to_string(),
        // bare commit hash, possibly "-dirty"
        None => format!("{}-{}", pkg_version, described),
    }
}
