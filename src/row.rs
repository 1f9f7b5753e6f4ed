// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The unit of work handed to a worker, and the function every worker
//! runs on it.
//!
//! A task carries everything needed to compute one row, so a worker
//! never consults anything but the task.  That is what lets any number
//! of workers run side by side without sharing a byte of state.

use image::Rgb;
use num::Complex;

use palette;
use planes::{IntegralPlane, Pixel, ViewState};

/// Once |z|² reaches this, the point is considered escaped.
pub const ESCAPE_NORM_SQR: f64 = 1025.0;

/// One row to compute, under one view, for one generation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RowTask {
    /// Index of the row, counted from the top of the image.
    pub row: usize,
    /// The rendering epoch this task belongs to.
    pub generation: u64,
    /// The rectangle of the complex plane being rendered.
    pub view: ViewState,
    /// Pixels per row.
    pub width: usize,
    /// Rows in the image.
    pub height: usize,
    /// Iteration limit before a point is declared inside the set.
    pub max_iterations: usize,
}

/// A finished row.  `pixels.len()` equals the width of the task it
/// came from.
#[derive(Clone, Debug, PartialEq)]
pub struct RowResult {
    /// Index of the row, counted from the top of the image.
    pub row: usize,
    /// The generation of the task that produced this row.
    pub generation: u64,
    /// The colours of the row, left to right.
    pub pixels: Vec<Rgb<u8>>,
}

/// This is our classic iterator function, which either returns the
/// number of iterations it took to escape the Mandelbrot set, or
/// it returns nothing at all.
pub fn escape_time(c: Complex<f64>, limit: usize) -> Option<usize> {
    let mut z = Complex { re: 0.0_f64, im: 0.0_f64 };
    for i in 0..limit {
        if z.norm_sqr() >= ESCAPE_NORM_SQR {
            return Some(i);
        }
        z = z * z + c;
    }
    None
}

/// Computes every pixel of the row described by `task`.
///
/// # Panics
///
/// If the row lies outside the image.  The coordinator never builds
/// such a task, so one arriving here means the coordinator is broken.
pub fn compute_row(task: &RowTask) -> RowResult {
    assert!(
        task.row < task.height,
        "row {} is outside an image {} rows high",
        task.row,
        task.height
    );
    let plane = IntegralPlane(task.width, task.height);
    let pixels = (0..task.width)
        .map(|column| {
            let c = task.view.pixel_to_point(&Pixel(column, task.row), &plane);
            palette::color(escape_time(c, task.max_iterations))
        })
        .collect();

    RowResult {
        row: task.row,
        generation: task.generation,
        pixels,
    }
}
