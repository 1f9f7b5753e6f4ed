//! Contains the ViewState struct, which describes the rectangle of the
//! complex plane currently being rendered, and its relationship to an
//! integral plane of pixels with an origin at 0,0 in the upper-left
//! corner.  Row 0 is the top edge of the view, so the imaginary axis
//! runs downward as the row index grows.
use num::Complex;

use errors::RenderError;

/// How far a single click zooms in.  The clicked point becomes the
/// centre of the new view, which spans `2 / ZOOM_FACTOR` of the old
/// view along each axis.
pub const ZOOM_FACTOR: f64 = 8.0;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

impl IntegralPlane {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.0
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.0 == 0 || self.1 == 0
    }
}

/// Describes the column, row of a pixel in a plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane mapped onto the image.  The real
/// axis runs left to right, the imaginary axis top to bottom from
/// `i_max` down to `i_min`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewState {
    /// Real part of the left edge.
    pub r_min: f64,
    /// Real part of the right edge.
    pub r_max: f64,
    /// Imaginary part of the bottom edge.
    pub i_min: f64,
    /// Imaginary part of the top edge.
    pub i_max: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            r_min: -2.5,
            r_max: 1.5,
            i_min: -1.5,
            i_max: 1.5,
        }
    }
}

impl ViewState {
    /// Constructor.  Takes the left-lower and right-upper corners of the
    /// region of the complex plane to render.
    pub fn new(leftlower: Complex<f64>, rightupper: Complex<f64>) -> Result<ViewState, RenderError> {
        let view = ViewState {
            r_min: leftlower.re,
            r_max: rightupper.re,
            i_min: leftlower.im,
            i_max: rightupper.im,
        };
        view.validate()?;
        Ok(view)
    }

    /// Checks that the view is a finite rectangle of positive area with
    /// its corners the right way round.
    pub fn validate(&self) -> Result<(), RenderError> {
        let corners = [self.r_min, self.r_max, self.i_min, self.i_max];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(RenderError::InvalidView(
                "The corners of the view must be finite numbers".to_string(),
            ));
        }

        if self.r_max <= self.r_min {
            return Err(RenderError::InvalidView(
                "The left lower corner is not to the left of the right upper corner".to_string(),
            ));
        }

        if self.i_max <= self.i_min {
            return Err(RenderError::InvalidView(
                "The left lower corner is not lower than the right upper corner".to_string(),
            ));
        }

        Ok(())
    }

    /// Real part of the given column.
    pub fn real_at(&self, column: usize, width: usize) -> f64 {
        self.r_min + ((self.r_max - self.r_min) * (column as f64)) / (width as f64)
    }

    /// Imaginary part of the given row.
    pub fn imag_at(&self, row: usize, height: usize) -> f64 {
        self.i_max + ((self.i_min - self.i_max) * (row as f64)) / (height as f64)
    }

    /// Given a pixel on the integral plane, map it to the equivalent
    /// location on the complex plane.
    pub fn pixel_to_point(&self, pixel: &Pixel, plane: &IntegralPlane) -> Complex<f64> {
        Complex::new(
            self.real_at(pixel.0, plane.width()),
            self.imag_at(pixel.1, plane.height()),
        )
    }

    /// Centres a new view on the clicked pixel, shrinking both extents
    /// by `factor / 2`.  The aspect ratio is unchanged.
    pub fn zoom(&self, pixel: &Pixel, plane: &IntegralPlane, factor: f64) -> ViewState {
        let width = self.r_max - self.r_min;
        // Negative: rows run from i_max down to i_min.
        let height = self.i_min - self.i_max;
        let click = self.pixel_to_point(pixel, plane);

        ViewState {
            r_min: click.re - width / factor,
            r_max: click.re + width / factor,
            i_max: click.im - height / factor,
            i_min: click.im + height / factor,
        }
    }

    /// Keeps the imaginary extent and the real midpoint, and stretches
    /// or narrows the real extent so the view has the aspect ratio of
    /// the plane.  An empty plane has no aspect ratio; the view is
    /// returned unchanged.
    pub fn fit(&self, plane: &IntegralPlane) -> ViewState {
        if plane.is_empty() {
            return *self;
        }
        let width = (self.i_max - self.i_min) * (plane.width() as f64) / (plane.height() as f64);
        let r_mid = (self.r_max + self.r_min) / 2.0;
        ViewState {
            r_min: r_mid - width / 2.0,
            r_max: r_mid + width / 2.0,
            ..*self
        }
    }
}
