use serde_json::Value;
use std::io;

use super::{flatten, result_of};

/// Write the result to stdout as two-column `field,value` CSV.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten(result_of(value)) {
        let _ = wtr.write_record([key, val]);
    }

    let _ = wtr.flush();
}
