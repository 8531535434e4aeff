//! gigstock main entrypoint.

use gigstock::run;
use gigstock::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
