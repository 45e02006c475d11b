// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelgather;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use mandelgather::palette::to_rgb_bytes;
use mandelgather::{Config, Exchange, Frame, ImageSpec, ViewWindow};
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";
const EXCHANGE: &str = "exchange";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelgather")
        .version("0.1.0")
        .about("Mandelbrot renderer with a rank-ordered gather")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the view window"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,1.5")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the view window"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse worker count",
                        "Worker count must be at least 1",
                    )
                })
                .help("Number of workers to split the rows among (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iterations before a point is considered bounded"),
        )
        .arg(
            Arg::with_name(EXCHANGE)
                .required(false)
                .long(EXCHANGE)
                .short("x")
                .takes_value(true)
                .possible_values(&["variable", "fixed"])
                .default_value("variable")
                .help("How strips are gathered: variable-size or fixed-stride"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, failure::Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("Missing value for --{}", name))
}

fn config(matches: &ArgMatches) -> Result<Config, failure::Error> {
    let (width, height): (usize, usize) =
        parse_pair(value(matches, SIZE)?, 'x').ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let leftlower = parse_complex(value(matches, LEFTLOWER)?)
        .ok_or_else(|| format_err!("Error parsing left lower point"))?;
    let rightupper = parse_complex(value(matches, RIGHTUPPER)?)
        .ok_or_else(|| format_err!("Error parsing right upper point"))?;
    let max_iterations = usize::from_str(value(matches, ITERATIONS)?)?;
    let workers = match matches.value_of(WORKERS) {
        Some(w) => usize::from_str(w)?,
        None => num_cpus::get().min(height).max(1),
    };
    let exchange = Exchange::from_str(value(matches, EXCHANGE)?).map_err(|e| format_err!("{}", e))?;

    Ok(Config {
        image: ImageSpec {
            width,
            height,
            max_iterations,
        },
        window: ViewWindow::from_corners(leftlower, rightupper),
        workers,
        exchange,
    })
}

fn write_image(outfile: &str, frame: &Frame) -> Result<(), failure::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    let pixels = to_rgb_bytes(&frame.pixels);
    encoder.encode(
        &pixels[..],
        frame.width as u32,
        frame.height as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

fn render(matches: &ArgMatches) -> Result<(), failure::Error> {
    let config = config(matches)?;
    let frame = mandelgather::run(&config)?;
    let elapsed = frame.elapsed.as_secs() as f64 + f64::from(frame.elapsed.subsec_nanos()) * 1e-9;
    info!("writing {}x{} image to {}", frame.width, frame.height, value(matches, OUTPUT)?);
    write_image(value(matches, OUTPUT)?, &frame)?;
    println!("Render time: {:.6} seconds", elapsed);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();
    if let Err(e) = render(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
