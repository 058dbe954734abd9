use std::fs;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn main() {
    println!("cargo:rerun-if-changed=src");

    let previous: u64 = fs::read_to_string(BUILD_NUMBER_FILE)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build = previous + 1;

    fs::write(BUILD_NUMBER_FILE, build.to_string()).expect("writing build_number.txt");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=CALORITRACK_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=CALORITRACK_BUILD_TIMESTAMP={}", timestamp);
}
