// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;
extern crate mandelgather;
extern crate num;

use criterion::Criterion;
use mandelgather::escape::escape_time;
use mandelgather::{run, Config, ImageSpec};
use num::Complex;

fn kernel(c: &mut Criterion) {
    c.bench_function("escape_time bounded point", |b| {
        b.iter(|| escape_time(Complex::new(-0.75, 0.0), 1000))
    });
}

fn group(c: &mut Criterion) {
    let mut config = Config::default();
    config.image = ImageSpec {
        width: 200,
        height: 150,
        max_iterations: 500,
    };
    config.workers = config.workers.min(150);
    c.bench_function("run 200x150", move |b| b.iter(|| run(&config)));
}

criterion_group!(benches, kernel, group);
criterion_main!(benches);
