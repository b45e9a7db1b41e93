//! rTaskMeter main entrypoint.

use rtaskmeter::run;
use rtaskmeter::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
