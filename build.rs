use std::process::Command;

fn main() {
    // Get git commit hash (short)
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    // Check if we're on a tagged release
    let is_release = Command::new("git")
        .args(["describe", "--exact-match", "--tags", "HEAD"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    // Set version suffix for development builds
    if is_release {
        println!("cargo:rustc-env=VALE_CONFIG_VERSION_SUFFIX=");
    } else {
        println!("cargo:rustc-env=VALE_CONFIG_VERSION_SUFFIX=-dev");
    }
    println!("cargo:rustc-env=VALE_CONFIG_GIT_HASH={}", git_hash);

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
