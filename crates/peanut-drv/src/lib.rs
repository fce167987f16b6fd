//! peanut-drv - The `peanut` command-line driver.
//!
//! Two modes:
//! - `peanut <script>` runs a script file and exits; program output goes
//!   to stdout, diagnostics to stderr, failures exit non-zero.
//! - `peanut` with no arguments opens the interactive line shell, which
//!   keeps one [`Runtime`] (and so one set of global tables) alive across
//!   lines.

pub mod repl;

use std::path::Path;

use anyhow::Context as _;
use peanut_interp::Runtime;

/// Entry point: dispatch on the command line.
pub fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(script) => run_file(Path::new(&script)),
        None => repl::run(),
    }
}

/// Run a script file to completion.
///
/// The final program value is not printed - output happens through the
/// `print` built-in. A diagnostic is rendered to stderr and the process
/// exits with status 1.
pub fn run_file(path: &Path) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut runtime = Runtime::new();
    if let Err(diagnostic) = runtime.run(&path.display().to_string(), &source) {
        eprintln!("{diagnostic}");
        std::process::exit(1);
    }
    Ok(())
}
