// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Instant;

use seatmap::{export, grouping, import_svg, ExportOptions, ParseOptions, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .format(|out, message, record|
            out.finish(format_args!("{}: {}", record.level(), message))
        ).chain(std::io::stderr()).apply()?;

    let start = Instant::now();

    let args: Vec<_> = env::args().collect();
    if args.len() != 3 {
        println!("Usage:\n\texport venue.svg out-dir");
        std::process::exit(1);
    }

    let input_data = fs::read_to_string(&args[1])?;
    let venue = import_svg(&input_data, &ParseOptions::default())?;
    if !venue.validation.is_valid() {
        eprintln!("Invalid venue: {}.", venue.validation);
        std::process::exit(1);
    }

    let mut session = Session::new(venue.tree);
    let groups: Vec<_> = session.descendants(session.root())
        .filter(|id| grouping::analyze_node(&session, *id).is_leaf_group)
        .collect();

    let mut applied = 0;
    for group in groups {
        let list = grouping::suggest_seats(&session, group);
        applied += grouping::apply_seat_suggestions(&mut session, &list)?;
    }

    let bundle = export(&session, &ExportOptions::default())?;

    let dir = Path::new(&args[2]);
    fs::create_dir_all(dir)?;
    for (name, content) in bundle.to_files()? {
        fs::write(dir.join(name), content)?;
    }

    println!("Seats: {} ({} suggestions applied)", bundle.seats.len(), applied);
    println!("Elapsed: {:.4}ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
