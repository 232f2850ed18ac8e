//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - per-qubit Bloch sphere projection for circuit designs",
        style("qcanvas").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcanvas-ir     Circuit model, store and JSON wire format");
    println!("  qcanvas-bloch  Bloch state projection engine");
    println!("  qcanvas-cli    Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/qcanvas/qcanvas").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
