// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong before or during a render.  Note that
//! a stale row is not in here: discarding it is the normal course of
//! business after a zoom.

use std::io;

/// Failures reported by the renderer and its configuration checks.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The image has no rows or no columns.
    #[fail(display = "The image must be at least one pixel wide and one pixel high")]
    EmptyImage,

    /// A pool of zero workers would never draw anything.
    #[fail(display = "The worker pool needs at least one worker")]
    NoWorkers,

    /// An iteration limit of zero colours every point the same.
    #[fail(display = "The iteration limit must be at least one")]
    NoIterations,

    /// The bounds of the complex plane are inverted or not finite.
    #[fail(display = "Invalid view: {}", _0)]
    InvalidView(String),

    /// Every worker hung up while rows were still outstanding.
    #[fail(display = "The worker pool disconnected before the image was complete")]
    PoolDisconnected,

    /// A worker thread panicked.
    #[fail(display = "A worker thread panicked")]
    WorkerPanicked,

    /// Writing the image failed.
    #[fail(display = "Image I/O failed: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}
