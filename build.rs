//! Build script baking the default API endpoint into the binary.

use std::env;

fn main() {
    // Load .env values (useful during development) before option_env! reads them
    let _ = dotenvy::dotenv();

    if let Ok(val) = env::var("ISSUEHUB_DEFAULT_API_URL") {
        println!("cargo:rustc-env=ISSUEHUB_DEFAULT_API_URL={}", val);
    }

    println!("cargo:rerun-if-env-changed=ISSUEHUB_DEFAULT_API_URL");
}
