//! In-memory raster surface.
//!
//! Lines are anti-aliased with Xiaolin Wu's algorithm and composited source-over onto an RGBA8
//! [`image::RgbaImage`]. The canvas lives behind a shared handle so the host can read it back
//! while (or after) a render thread draws on it.

use crate::foundation::core::{FrameRGBA, Point, Rect, Rgb8};
use crate::foundation::error::{SpiroError, SpiroResult};
use crate::render::surface::{DeviceProvider, Surface};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to a pixmap canvas.
#[derive(Clone, Debug)]
pub struct PixmapCanvas {
    inner: Arc<Mutex<image::RgbaImage>>,
}

impl PixmapCanvas {
    /// Create a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(image::RgbaImage::new(width, height))),
        }
    }

    fn lock(&self) -> SpiroResult<MutexGuard<'_, image::RgbaImage>> {
        self.inner
            .lock()
            .map_err(|_| SpiroError::device("pixmap canvas lock poisoned"))
    }

    /// Canvas dimensions.
    pub fn size(&self) -> SpiroResult<(u32, u32)> {
        Ok(self.lock()?.dimensions())
    }

    /// Copy the canvas into a [`FrameRGBA`].
    pub fn frame(&self) -> SpiroResult<FrameRGBA> {
        let img = self.lock()?;
        FrameRGBA::new(img.width(), img.height(), img.as_raw().clone())
    }

    /// Encode the canvas as PNG at `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> SpiroResult<()> {
        let path = path.as_ref();
        let img = self.lock()?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| SpiroError::capture(format!("write png '{}': {e}", path.display())))
    }

    fn replace(&self, width: u32, height: u32) -> SpiroResult<()> {
        *self.lock()? = image::RgbaImage::new(width, height);
        Ok(())
    }
}

/// [`Surface`] drawing into a [`PixmapCanvas`].
#[derive(Debug)]
pub struct PixmapSurface {
    canvas: PixmapCanvas,
    bounds: Rect,
}

impl PixmapSurface {
    /// Wrap an existing canvas.
    pub fn new(canvas: PixmapCanvas) -> SpiroResult<Self> {
        let (w, h) = canvas.size()?;
        Ok(Self {
            canvas,
            bounds: Rect::new(0.0, 0.0, f64::from(w), f64::from(h)),
        })
    }

    /// The canvas this surface draws into.
    pub fn canvas(&self) -> &PixmapCanvas {
        &self.canvas
    }
}

impl Surface for PixmapSurface {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn clear(&mut self, color: Rgb8) -> SpiroResult<()> {
        let mut img = self.canvas.lock()?;
        let px = image::Rgba(color.with_alpha(255));
        for p in img.pixels_mut() {
            *p = px;
        }
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb8) -> SpiroResult<()> {
        if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
            return Err(SpiroError::render(format!(
                "non-finite line segment {from:?} -> {to:?}"
            )));
        }
        let mut img = self.canvas.lock()?;
        draw_line_aa(&mut img, from, to, color);
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        self.canvas.frame().ok()
    }
}

/// [`DeviceProvider`] handing out [`PixmapSurface`]s over one shared canvas.
///
/// Every acquisition reallocates the canvas at the current size, mirroring a fresh device
/// context.
#[derive(Debug)]
pub struct PixmapDevice {
    canvas: PixmapCanvas,
    width: u32,
    height: u32,
    acquired: u64,
}

impl PixmapDevice {
    /// Create a device for a `width` x `height` canvas.
    pub fn new(width: u32, height: u32) -> SpiroResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpiroError::validation(
                "pixmap width/height must be non-zero",
            ));
        }
        Ok(Self {
            canvas: PixmapCanvas::new(width, height),
            width,
            height,
            acquired: 0,
        })
    }

    /// Handle to the shared canvas.
    pub fn canvas(&self) -> PixmapCanvas {
        self.canvas.clone()
    }

    /// Size used by the next acquisition.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Number of surfaces acquired so far.
    pub fn acquisitions(&self) -> u64 {
        self.acquired
    }
}

impl DeviceProvider for PixmapDevice {
    type Surface = PixmapSurface;

    fn acquire(&mut self) -> SpiroResult<PixmapSurface> {
        if self.width == 0 || self.height == 0 {
            return Err(SpiroError::device("cannot acquire an empty pixmap surface"));
        }
        self.canvas.replace(self.width, self.height)?;
        self.acquired += 1;
        PixmapSurface::new(self.canvas.clone())
    }
}

fn blend(img: &mut image::RgbaImage, x: i64, y: i64, color: Rgb8, coverage: f64) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let c = coverage.clamp(0.0, 1.0);
    if c <= 0.0 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    let mix = |dst: u8, src: u8| -> u8 {
        (f64::from(src) * c + f64::from(dst) * (1.0 - c)).round() as u8
    };
    let [r, g, b, a] = px.0;
    px.0 = [
        mix(r, color.r),
        mix(g, color.g),
        mix(b, color.b),
        (c * 255.0 + f64::from(a) * (1.0 - c)).round() as u8,
    ];
}

fn draw_line_aa(img: &mut image::RgbaImage, from: Point, to: Point, color: Rgb8) {
    fn fpart(v: f64) -> f64 {
        v - v.floor()
    }
    fn rfpart(v: f64) -> f64 {
        1.0 - fpart(v)
    }

    let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, to.x, to.y);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let mut plot = |x: i64, y: i64, c: f64| {
        if steep {
            blend(img, y, x, color, c);
        } else {
            blend(img, x, y, color, c);
        }
    };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx == 0.0 { 1.0 } else { dy / dx };

    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpx1 = xend as i64;
    let ypx1 = yend.floor() as i64;
    plot(xpx1, ypx1, rfpart(yend) * xgap);
    plot(xpx1, ypx1 + 1, fpart(yend) * xgap);
    let mut intery = yend + gradient;

    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpx2 = xend as i64;
    let ypx2 = yend.floor() as i64;
    if xpx2 != xpx1 {
        plot(xpx2, ypx2, rfpart(yend) * xgap);
        plot(xpx2, ypx2 + 1, fpart(yend) * xgap);
    }

    for x in (xpx1 + 1)..xpx2 {
        let iy = intery.floor() as i64;
        plot(x, iy, rfpart(intery));
        plot(x, iy + 1, fpart(intery));
        intery += gradient;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixmap.rs"]
mod tests;
