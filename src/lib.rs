#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer on a pool of workers
//!
//! The Mandelbrot set is drawn one row at a time.  Every row is an
//! independent little job: for each pixel, take the matching point c
//! on the complex plane, iterate z = z² + c from zero, and colour the
//! pixel by how many steps it took z to fly off towards infinity.
//! Points that never escape are inside the set and are painted black.
//!
//! Because rows are independent, a coordinator hands them out to a
//! pool of workers one at a time, from a single shared cursor, and
//! draws them as they come back in whatever order they finish.  When
//! the view changes (a zoom, a resize) the coordinator starts a new
//! generation.  Workers still chewing on rows from the old view are
//! allowed to finish, but the rows they return are thrown away.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

#[cfg(test)]
extern crate rand;

pub mod coordinator;
pub mod errors;
pub mod palette;
pub mod planes;
pub mod pool;
pub mod render;
pub mod row;

pub use coordinator::{Dispatcher, FractalCoordinator, RenderStats, RowSink, ViewChange, WorkerId};
pub use errors::RenderError;
pub use planes::{IntegralPlane, Pixel, ViewState, ZOOM_FACTOR};
pub use pool::WorkerPool;
pub use render::{render, render_serial, Interaction, RenderConfig};
pub use row::{compute_row, RowResult, RowTask};

