use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
    println!("cargo:rerun-if-env-changed=VBASYNC_RELEASE");

    let hash = git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_default();
    let commit_date = git(&["show", "-s", "--format=%cs", "HEAD"]).unwrap_or_default();

    // Release builds are tagged vbasync-v<version>; a plain v<version> also counts.
    let version = env!("CARGO_PKG_VERSION");
    let tagged = git(&["tag", "--points-at", "HEAD"])
        .map(|tags| {
            tags.lines()
                .any(|tag| tag == format!("vbasync-v{}", version) || tag == format!("v{}", version))
        })
        .unwrap_or(false);
    let clean = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|status| status.is_empty())
        .unwrap_or(false);
    let is_release = std::env::var_os("VBASYNC_RELEASE").is_some() || (tagged && clean);

    println!("cargo:rustc-env=GIT_HASH={}", hash);
    println!("cargo:rustc-env=GIT_COMMIT_DATE={}", commit_date);
    println!("cargo:rustc-env=IS_RELEASE={}", is_release);
}
