extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelpool;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::{ColorType, RgbImage};
use mandelpool::render::DEFAULT_WORKERS;
use mandelpool::{IntegralPlane, Interaction, Pixel, RenderConfig, ViewChange, ViewState};
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Splits `s` at the first `separator` and parses both halves, naming
/// `what` in the error when either half is missing or malformed.
fn split_parse<T: FromStr>(s: &str, separator: char, what: &str) -> Result<(T, T), String> {
    let mut halves = s.splitn(2, separator).map(str::trim).map(T::from_str);
    match (halves.next(), halves.next()) {
        (Some(Ok(first)), Some(Ok(second))) => Ok((first, second)),
        _ => Err(format!("Could not parse {} from '{}'", what, s)),
    }
}

fn parse_point(s: &str, what: &str) -> Result<Complex<f64>, String> {
    split_parse::<f64>(s, ',', what).map(|(re, im)| Complex::new(re, im))
}

fn parse_count(s: &str, what: &str, low: usize, high: usize) -> Result<usize, String> {
    let count = usize::from_str(s.trim())
        .map_err(|_| format!("Could not parse {} from '{}'", what, s))?;
    if count < low || count > high {
        return Err(format!("{} must be between {} and {}", what, low, high));
    }
    Ok(count)
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";
const ZOOM: &str = "zoom";
const ZOOM_AFTER: &str = "zoom-after";

const MAX_ITERATIONS: usize = 200_000;

fn args<'a>() -> ArgMatches<'a> {
    let max_workers = std::cmp::max(DEFAULT_WORKERS, num_cpus::get() * 4);

    App::new("mandel")
        .version("0.1.0")
        .about("Renders the Mandelbrot set row by row on a pool of workers")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| split_parse::<u16>(&s, 'x', "output image size").map(|_| ()))
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
                .validator(|s| parse_point(&s, "left lower corner").map(|_| ()))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.5,1.5")
                .validator(|s| parse_point(&s, "right upper corner").map(|_| ()))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value("8")
                .validator(move |s| parse_count(&s, "Worker count", 1, max_workers).map(|_| ()))
                .help("Number of workers in the pool"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1024")
                .validator(|s| parse_count(&s, "Iteration count", 1, MAX_ITERATIONS).map(|_| ()))
                .help("Iterations before a point counts as inside the set"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| split_parse::<usize>(&s, ',', "zoom pixel").map(|_| ()))
                .help("Pixel X,Y to zoom in on mid-render; may be repeated"),
        )
        .arg(
            Arg::with_name(ZOOM_AFTER)
                .required(false)
                .long(ZOOM_AFTER)
                .short("a")
                .takes_value(true)
                .validator(|s| parse_count(&s, "Row count", 1, usize::max_value()).map(|_| ()))
                .help("Rows drawn before each zoom interrupts the render (default: a quarter of the height)"),
        )
        .get_matches()
}

fn write_image(outfile: &str, image: &RgbImage) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let (width, height) = image.dimensions();
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    let samples: &[u8] = image;
    encoder.encode(samples, width, height, ColorType::RGB(8))?;
    Ok(())
}

/// Looks up an argument clap has already validated, reparsing it with
/// `parse`.
fn value<T, F>(matches: &ArgMatches, name: &str, parse: F) -> Result<T, Error>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("No value given for {}", name))?;
    parse(raw).map_err(|e| format_err!("{}", e))
}

fn config(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let (width, height) = value(matches, SIZE, |s| {
        split_parse::<usize>(s, 'x', "output image size")
    })?;
    let leftlower = value(matches, LEFTLOWER, |s| parse_point(s, "left lower corner"))?;
    let rightupper = value(matches, RIGHTUPPER, |s| parse_point(s, "right upper corner"))?;
    let workers = value(matches, WORKERS, |s| {
        parse_count(s, "Worker count", 1, usize::max_value())
    })?;
    let max_iterations = value(matches, ITERATIONS, |s| {
        parse_count(s, "Iteration count", 1, MAX_ITERATIONS)
    })?;

    Ok(RenderConfig {
        plane: IntegralPlane(width, height),
        view: ViewState::new(leftlower, rightupper)?,
        workers,
        max_iterations,
    })
}

fn interactions(matches: &ArgMatches, plane: IntegralPlane) -> Result<Vec<Interaction>, Error> {
    let after_rows = if matches.is_present(ZOOM_AFTER) {
        value(matches, ZOOM_AFTER, |s| {
            parse_count(s, "Row count", 1, usize::max_value())
        })?
    } else {
        std::cmp::max(1, plane.height() / 4)
    };
    let zooms: Vec<&str> = match matches.values_of(ZOOM) {
        Some(values) => values.collect(),
        None => vec![],
    };
    zooms
        .into_iter()
        .map(|s| zoom_at(s, plane, after_rows))
        .collect()
}

fn zoom_at(s: &str, plane: IntegralPlane, after_rows: usize) -> Result<Interaction, Error> {
    let (x, y) =
        split_parse::<usize>(s, ',', "zoom pixel").map_err(|e| format_err!("{}", e))?;
    if x >= plane.width() || y >= plane.height() {
        return Err(format_err!("Zoom pixel {} lies outside the image", s));
    }
    Ok(Interaction {
        after_rows,
        change: ViewChange::Zoom(Pixel(x, y)),
    })
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = config(matches)?;
    let interactions = interactions(matches, config.plane)?;
    info!(
        "rendering {}x{} on {} worker(s) with {} zoom(s)",
        config.plane.width(),
        config.plane.height(),
        config.workers,
        interactions.len()
    );
    let image = mandelpool::render(&config, &interactions)?;
    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| format_err!("No output file given"))?;
    write_image(output, &image)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_parse_needs_both_halves() {
        assert_eq!(split_parse::<usize>("640x480", 'x', "size"), Ok((640, 480)));
        assert_eq!(split_parse::<i32>(" -3 , 7 ", ',', "pair"), Ok((-3, 7)));
        assert!(split_parse::<usize>("640", 'x', "size").is_err());
        assert!(split_parse::<usize>("640x", 'x', "size").is_err());
        assert!(split_parse::<usize>("x480", 'x', "size").is_err());
        assert!(split_parse::<usize>("640x480x2", 'x', "size").is_err());
    }

    #[test]
    fn parse_point_reads_negative_corners() {
        assert_eq!(parse_point("-2.5,-1.5", "corner"), Ok(Complex::new(-2.5, -1.5)));
        let err = parse_point("-2.5;-1.5", "left lower corner").unwrap_err();
        assert!(err.contains("left lower corner"));
    }

    #[test]
    fn parse_count_enforces_the_range() {
        assert_eq!(parse_count("8", "Worker count", 1, 32), Ok(8));
        assert_eq!(parse_count("32", "Worker count", 1, 32), Ok(32));
        assert_eq!(
            parse_count("0", "Worker count", 1, 32),
            Err("Worker count must be between 1 and 32".to_string())
        );
        assert!(parse_count("many", "Worker count", 1, 32).is_err());
    }

    #[test]
    fn zooms_must_land_inside_the_image() {
        let plane = IntegralPlane(64, 48);
        let zoom = zoom_at("63,47", plane, 5).unwrap();
        assert_eq!(zoom.after_rows, 5);
        assert_eq!(zoom.change, ViewChange::Zoom(Pixel(63, 47)));
        assert!(zoom_at("64,0", plane, 5).is_err());
        assert!(zoom_at("0,48", plane, 5).is_err());
    }
}
