// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The FractalCoordinator hands rows out to a pool of workers and
//! collects them as they come back.
//!
//! Rows are claimed from a single cursor shared by the whole pool, so
//! a worker that finishes early simply claims the next row; nobody is
//! handed a fixed stripe of the image.  Every task is tagged with the
//! generation it was built for.  Changing the view starts a new
//! generation, and any row that comes back tagged with an older one is
//! dropped on arrival.  Workers busy with a stale row are never
//! interrupted; they pick up the new generation's work once they reply.
//!
//! The coordinator never blocks and never spawns anything.  It talks to
//! its workers through a [`Dispatcher`] and to the screen through a
//! [`RowSink`], which is what lets the tests drive it one reply at a
//! time.

use image::{Rgb, RgbImage};

use planes::{IntegralPlane, Pixel, ViewState, ZOOM_FACTOR};
use row::{RowResult, RowTask};

/// Index of a worker in the pool.
pub type WorkerId = usize;

/// How the coordinator sends work to a worker.  Delivery is fire and
/// forget; the reply arrives later through
/// [`FractalCoordinator::on_worker_reply`].
pub trait Dispatcher {
    /// Hand `task` to `worker`.  The worker has no other outstanding
    /// task when this is called.
    fn dispatch(&mut self, worker: WorkerId, task: RowTask);
}

/// Where finished rows go.  Rows arrive in any order, and any given row
/// at most once per generation.
pub trait RowSink {
    /// Display one row of pixels.
    fn draw_row(&mut self, row: usize, pixels: &[Rgb<u8>]);

    /// The image changed size.  Called before the first row of the new
    /// size is drawn.
    fn resize(&mut self, _plane: IntegralPlane) {}
}

impl RowSink for RgbImage {
    fn draw_row(&mut self, row: usize, pixels: &[Rgb<u8>]) {
        for (column, pixel) in pixels.iter().enumerate() {
            self.put_pixel(column as u32, row as u32, *pixel);
        }
    }

    fn resize(&mut self, plane: IntegralPlane) {
        *self = RgbImage::new(plane.width() as u32, plane.height() as u32);
    }
}

/// Counters kept across the whole life of a coordinator.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Generations started, including the first.
    pub generations: u64,
    /// Rows handed to the sink.
    pub rows_drawn: usize,
    /// Rows dropped because their generation was stale.
    pub rows_discarded: usize,
}

/// A change of view, as a click or a window resize would produce.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ViewChange {
    /// Zoom in on a pixel of the current image.
    Zoom(Pixel),
    /// Resize the image, refitting the view to the new aspect ratio.
    Resize(IntegralPlane),
    /// Jump to an explicit region.
    Bounds(ViewState),
}

#[derive(Copy, Clone, Debug)]
struct WorkerSlot {
    id: WorkerId,
    idle: bool,
}

/// Hands rows to workers and routes finished rows to the sink.
pub struct FractalCoordinator<D, S> {
    dispatcher: D,
    sink: S,
    slots: Vec<WorkerSlot>,
    next_row: usize,
    generation: u64,
    view: ViewState,
    plane: IntegralPlane,
    max_iterations: usize,
    drawn_this_generation: usize,
    stats: RenderStats,
}

impl<D: Dispatcher, S: RowSink> FractalCoordinator<D, S> {
    /// Creates a coordinator for a pool of `workers` workers, all idle.
    /// Nothing is dispatched until [`start`](#method.start).
    pub fn new(
        dispatcher: D,
        sink: S,
        workers: usize,
        view: ViewState,
        plane: IntegralPlane,
        max_iterations: usize,
    ) -> Self {
        FractalCoordinator {
            dispatcher,
            sink,
            slots: (0..workers).map(|id| WorkerSlot { id, idle: true }).collect(),
            next_row: 0,
            generation: 0,
            view,
            plane,
            max_iterations,
            drawn_this_generation: 0,
            stats: RenderStats::default(),
        }
    }

    /// Starts the first generation.
    ///
    /// # Panics
    ///
    /// If any worker is already busy.
    pub fn start(&mut self) {
        assert!(self.is_settled(), "start() called with workers still busy");
        self.restart();
    }

    /// Begins a new generation: bumps the generation, rewinds the row
    /// cursor, and hands a row to each idle worker in pool order.  Busy
    /// workers are left alone.  If the image has fewer rows than there
    /// are idle workers, the surplus workers stay idle.
    pub fn restart(&mut self) {
        self.generation += 1;
        self.next_row = 0;
        self.drawn_this_generation = 0;
        self.stats.generations += 1;
        debug!(
            "generation {}: {:?} at {}x{}",
            self.generation,
            self.view,
            self.plane.width(),
            self.plane.height()
        );

        for index in 0..self.slots.len() {
            if !self.slots[index].idle {
                continue;
            }
            if self.next_row >= self.plane.height() {
                break;
            }
            let task = self.create_task(self.next_row);
            let slot = &mut self.slots[index];
            slot.idle = false;
            self.dispatcher.dispatch(slot.id, task);
            self.next_row += 1;
        }
    }

    /// Handles a finished row from `worker`.  A row from the current
    /// generation goes to the sink; anything older is dropped.  Either
    /// way the worker is free again and is reassigned.
    ///
    /// # Panics
    ///
    /// If `worker` is not in the pool or had no outstanding task.
    pub fn on_worker_reply(&mut self, worker: WorkerId, result: RowResult) {
        assert!(
            !self.slot(worker).idle,
            "worker {} replied without an outstanding task",
            worker
        );

        if result.generation == self.generation {
            debug_assert_eq!(result.pixels.len(), self.plane.width());
            self.sink.draw_row(result.row, &result.pixels);
            self.drawn_this_generation += 1;
            self.stats.rows_drawn += 1;
        } else {
            trace!(
                "dropping row {} of generation {} (current {})",
                result.row,
                result.generation,
                self.generation
            );
            self.stats.rows_discarded += 1;
        }

        self.reassign(worker);
    }

    /// Claims the next row for `worker`.  If the cursor has run past the
    /// bottom of the image, the worker goes idle instead.
    pub fn reassign(&mut self, worker: WorkerId) {
        let row = self.next_row;
        self.next_row += 1;

        if row >= self.plane.height() {
            self.slot_mut(worker).idle = true;
        } else {
            let task = self.create_task(row);
            self.slot_mut(worker).idle = false;
            self.dispatcher.dispatch(worker, task);
        }
    }

    /// Replaces the view and starts over.
    pub fn on_view_change(&mut self, view: ViewState) {
        self.view = view;
        self.restart();
    }

    /// Zooms in on the given pixel by [`ZOOM_FACTOR`] and starts over.
    pub fn zoom(&mut self, pixel: Pixel) {
        let view = self.view.zoom(&pixel, &self.plane, ZOOM_FACTOR);
        self.on_view_change(view);
    }

    /// Changes the image size, refits the view to its aspect ratio, and
    /// starts over.
    pub fn resize(&mut self, plane: IntegralPlane) {
        self.plane = plane;
        self.sink.resize(plane);
        let view = self.view.fit(&plane);
        self.on_view_change(view);
    }

    /// Applies any kind of view change.
    pub fn apply(&mut self, change: ViewChange) {
        match change {
            ViewChange::Zoom(pixel) => self.zoom(pixel),
            ViewChange::Resize(plane) => self.resize(plane),
            ViewChange::Bounds(view) => self.on_view_change(view),
        }
    }

    /// True when no worker has an outstanding task.
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|slot| slot.idle)
    }

    /// True if `worker` has no outstanding task.
    pub fn is_idle(&self, worker: WorkerId) -> bool {
        self.slot(worker).idle
    }

    /// Number of workers in the pool.
    pub fn workers(&self) -> usize {
        self.slots.len()
    }

    /// The current generation.  Zero until the first start.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The row the next reassignment will claim.
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// The view currently being rendered.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// The size of the image currently being rendered.
    pub fn plane(&self) -> IntegralPlane {
        self.plane
    }

    /// Rows of the current generation handed to the sink so far.
    pub fn rows_drawn(&self) -> usize {
        self.drawn_this_generation
    }

    /// Counters across every generation so far.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// The drawing collaborator.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The worker transport.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Tears the coordinator down, dropping the dispatcher first, and
    /// returns the sink.
    pub fn into_sink(self) -> S {
        let FractalCoordinator { dispatcher, sink, .. } = self;
        drop(dispatcher);
        sink
    }

    fn create_task(&self, row: usize) -> RowTask {
        RowTask {
            row,
            generation: self.generation,
            view: self.view,
            width: self.plane.width(),
            height: self.plane.height(),
            max_iterations: self.max_iterations,
        }
    }

    fn slot(&self, worker: WorkerId) -> &WorkerSlot {
        self.slots
            .get(worker)
            .unwrap_or_else(|| panic!("worker {} is not in the pool", worker))
    }

    fn slot_mut(&mut self, worker: WorkerId) -> &mut WorkerSlot {
        self.slots
            .get_mut(worker)
            .unwrap_or_else(|| panic!("worker {} is not in the pool", worker))
    }
}
