// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drives a coordinator and a worker pool to a finished image.
//!
//! The render loop is the coordinator's event loop: it waits for a
//! reply, hands it to the coordinator, and goes around again until no
//! worker is busy.  Interactions stand in for a user who clicks or
//! resizes the window while the picture is still being drawn; each one
//! is applied once enough rows of the current generation are on screen.

extern crate crossbeam;

use crossbeam::channel;
use image::RgbImage;
use itertools::Itertools;

use coordinator::{FractalCoordinator, RowSink, ViewChange};
use errors::RenderError;
use planes::{IntegralPlane, ViewState};
use pool::{Reply, WorkerPool};
use row::{compute_row, RowTask};

/// Workers in the pool unless told otherwise.
pub const DEFAULT_WORKERS: usize = 8;

/// Iteration limit unless told otherwise.
pub const DEFAULT_ITERATIONS: usize = 1024;

/// Everything a render needs to know before it starts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Size of the image.
    pub plane: IntegralPlane,
    /// Region of the complex plane to draw.
    pub view: ViewState,
    /// Number of worker threads.
    pub workers: usize,
    /// Iteration limit per point.
    pub max_iterations: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            plane: IntegralPlane(800, 600),
            view: ViewState::default(),
            workers: DEFAULT_WORKERS,
            max_iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl RenderConfig {
    /// Rejects configurations that could never produce a picture.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.plane.is_empty() {
            return Err(RenderError::EmptyImage);
        }
        if self.workers == 0 {
            return Err(RenderError::NoWorkers);
        }
        if self.max_iterations == 0 {
            return Err(RenderError::NoIterations);
        }
        self.view.validate()
    }
}

/// A view change and the moment it happens: once `after_rows` rows of
/// the generation in progress have been drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interaction {
    /// Rows of the current generation to draw before the change.
    pub after_rows: usize,
    /// What changes.
    pub change: ViewChange,
}

/// Renders `config` on a pool of worker threads, applying each of the
/// `interactions` in turn, and returns the image of the last view.
pub fn render(config: &RenderConfig, interactions: &[Interaction]) -> Result<RgbImage, RenderError> {
    config.validate()?;
    for interaction in interactions {
        match interaction.change {
            ViewChange::Resize(plane) if plane.is_empty() => return Err(RenderError::EmptyImage),
            ViewChange::Bounds(view) => view.validate()?,
            _ => {}
        }
    }

    let (replies, inbox) = channel::unbounded::<Reply>();
    crossbeam::scope(|scope| -> Result<_, RenderError> {
        let pool = WorkerPool::spawn(scope, config.workers, replies);
        debug!("spawned {} worker(s)", pool.size());
        let sink = RgbImage::new(config.plane.width() as u32, config.plane.height() as u32);
        let mut coordinator = FractalCoordinator::new(
            pool,
            sink,
            config.workers,
            config.view,
            config.plane,
            config.max_iterations,
        );

        let mut pending = interactions.iter();
        let mut next = pending.next();
        coordinator.start();

        while !coordinator.is_settled() {
            let (worker, result) = inbox.recv().map_err(|_| RenderError::PoolDisconnected)?;
            coordinator.on_worker_reply(worker, result);

            if let Some(interaction) = next {
                if coordinator.rows_drawn() >= interaction.after_rows {
                    debug!("applying {:?}", interaction.change);
                    coordinator.apply(interaction.change);
                    next = pending.next();
                }
            }
        }

        let unapplied = next.into_iter().chain(pending).collect_vec();
        if !unapplied.is_empty() {
            warn!("render finished before {} interaction(s) fired", unapplied.len());
        }

        let stats = coordinator.stats();
        info!(
            "rendered {:?} over {} generation(s): {} row(s) drawn, {} stale row(s) dropped",
            coordinator.view(),
            stats.generations,
            stats.rows_drawn,
            stats.rows_discarded
        );
        // Dropping the pool closes every task channel; the workers exit and
        // the scope can join them.
        Ok(coordinator.into_sink())
    })
    // Only a panic in a spawned worker comes back as Err; one on this
    // thread unwinds straight through the scope.
    .map_err(|_| RenderError::WorkerPanicked)?
}

/// Draws every row of `config` on the calling thread, top to bottom.
pub fn render_serial(config: &RenderConfig) -> Result<RgbImage, RenderError> {
    config.validate()?;
    let mut image = RgbImage::new(config.plane.width() as u32, config.plane.height() as u32);
    for row in 0..config.plane.height() {
        let result = compute_row(&RowTask {
            row,
            generation: 1,
            view: config.view,
            width: config.plane.width(),
            height: config.plane.height(),
            max_iterations: config.max_iterations,
        });
        image.draw_row(result.row, &result.pixels);
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RenderConfig {
        RenderConfig {
            plane: IntegralPlane(48, 32),
            workers: 4,
            max_iterations: 64,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn validate_rejects_unusable_configs() {
        let mut config = small();
        config.plane = IntegralPlane(0, 10);
        assert!(match config.validate() {
            Err(RenderError::EmptyImage) => true,
            _ => false,
        });

        let mut config = small();
        config.workers = 0;
        assert!(match config.validate() {
            Err(RenderError::NoWorkers) => true,
            _ => false,
        });

        let mut config = small();
        config.max_iterations = 0;
        assert!(match config.validate() {
            Err(RenderError::NoIterations) => true,
            _ => false,
        });

        let mut config = small();
        config.view.r_max = config.view.r_min;
        assert!(match config.validate() {
            Err(RenderError::InvalidView(_)) => true,
            _ => false,
        });
    }

    #[test]
    fn pool_render_matches_serial_render() {
        let config = small();
        let pooled = render(&config, &[]).unwrap();
        let serial = render_serial(&config).unwrap();
        assert_eq!(pooled.dimensions(), (48, 32));
        assert_eq!(pooled.into_raw(), serial.into_raw());
    }

    #[test]
    fn a_single_worker_is_enough() {
        let config = RenderConfig { workers: 1, ..small() };
        assert_eq!(
            render(&config, &[]).unwrap().into_raw(),
            render_serial(&config).unwrap().into_raw()
        );
    }

    #[test]
    fn more_workers_than_rows() {
        let config = RenderConfig {
            plane: IntegralPlane(10, 3),
            workers: 8,
            ..small()
        };
        assert_eq!(
            render(&config, &[]).unwrap().into_raw(),
            render_serial(&config).unwrap().into_raw()
        );
    }

    #[test]
    fn resize_to_nothing_is_refused() {
        let resize = Interaction {
            after_rows: 1,
            change: ViewChange::Resize(IntegralPlane(0, 0)),
        };
        assert!(render(&small(), &[resize]).is_err());
    }

    #[test]
    fn unusable_bounds_are_refused() {
        let inverted = ViewState {
            r_min: 1.0,
            r_max: -1.0,
            ..ViewState::default()
        };
        let nan = ViewState {
            i_min: std::f64::NAN,
            ..ViewState::default()
        };
        for &view in &[inverted, nan] {
            let bounds = Interaction {
                after_rows: 1,
                change: ViewChange::Bounds(view),
            };
            assert!(match render(&small(), &[bounds]) {
                Err(RenderError::InvalidView(_)) => true,
                _ => false,
            });
        }
    }
}
