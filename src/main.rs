use std::process::exit;

use sitewright::ui::output;

fn main() {
    if let Err(e) = sitewright::cli::run() {
        output::error(format!("{e:#}"));
        exit(1);
    }
}
