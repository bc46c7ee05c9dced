//! dmypy-bridge binary
//!
//! All logic is in the library; main.rs only invokes `cli::run()`.

use dmypy_bridge::ExitCode;

fn main() {
    // cli::run() prints its own errors
    let code = dmypy_bridge::cli::run().err().unwrap_or(ExitCode::SUCCESS);
    std::process::exit(code.as_i32());
}
