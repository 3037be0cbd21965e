// Copyright 2018 Evgeniy Reizner
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate bencher;

use std::fmt::Write;

use bencher::Bencher;

use seatmap::{export, grouping, import_svg, ExportOptions, ParseOptions, Session};

/// Generates a venue with `rows` rows of `seats` labeled seats.
fn venue(rows: usize, seats: usize) -> String {
    let mut text = String::from("<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 2000 2000'>\n");
    text.push_str("<style>.seat { fill: #ff0000; stroke: #000; stroke-width: 1px }</style>\n");
    text.push_str("<g id='background'><rect width='2000' height='2000' fill='#eee'/></g>\n");
    text.push_str("<g id='tickets'>\n");
    for r in 0..rows {
        let y = 20 + r * 15;
        let _ = writeln!(text, "<g id='R{}'>", r + 1);
        for s in 0..seats {
            let x = 20 + s * 15;
            let _ = writeln!(text, "<rect class='seat' x='{}' y='{}' width='10' height='10'/>", x, y);
            let _ = writeln!(text, "<text x='{}' y='{}' font-size='6'>{}</text>", x + 2, y + 8, s + 1);
        }
        text.push_str("</g>\n");
    }
    text.push_str("</g>\n");
    text.push_str("<g id='masks'><rect id='ZA' width='1000' height='1000'/></g>\n");
    text.push_str("</svg>\n");
    text
}

macro_rules! do_import {
    ($name:ident, $rows:expr, $seats:expr) => (
        fn $name(bencher: &mut Bencher) {
            let text = venue($rows, $seats);
            let opt = ParseOptions::default();
            bencher.iter(|| {
                let _ = import_svg(&text, &opt).unwrap();
            })
        }
    )
}

do_import!(import_small, 5, 10);
do_import!(import_medium, 20, 40);
do_import!(import_large, 60, 80);

macro_rules! do_export {
    ($name:ident, $rows:expr, $seats:expr) => (
        fn $name(bencher: &mut Bencher) {
            let venue = import_svg(&venue($rows, $seats), &ParseOptions::default()).unwrap();
            let mut session = Session::new(venue.tree);
            let tickets = session.find_by_identifier("tickets").unwrap();
            for row in session.children(tickets).to_vec() {
                let list = grouping::suggest_seats(&session, row);
                grouping::apply_seat_suggestions(&mut session, &list).unwrap();
            }

            let opt = ExportOptions::default();
            bencher.iter(|| {
                let _ = export(&session, &opt).unwrap();
            })
        }
    )
}

do_export!(export_small, 5, 10);
do_export!(export_medium, 20, 40);
do_export!(export_large, 60, 80);

benchmark_group!(benches1, import_small, import_medium, import_large);
benchmark_group!(benches2, export_small, export_medium, export_large);
benchmark_main!(benches1, benches2);
