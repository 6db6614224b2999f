#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod validate_json;

use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let task = args.first().map(|e| return e.as_str()).unwrap_or_default();

    if task == "validate-json" {
        if args.len() < 2 {
            eprintln!("ERROR: validate-json needs at least one path");
            process::exit(1);
        }

        let reports = validate_json::validate_all(&args[1..]);
        for report in reports.iter() {
            println!("{report}");
        }
        if reports.iter().any(|report| return !report.is_valid()) {
            process::exit(1);
        }
    } else {
        eprintln!("ERROR: No task selected");
        process::exit(1);
    }
}
