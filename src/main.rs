//! ghpub binary entry point.

use ghpublish::ui::output;

fn main() {
    if let Err(err) = ghpublish::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
