//! CPU raster implementation of [`DrawingSurface`].
//!
//! [`Canvas`] draws strokes into an [`RgbaImage`] that can be saved as a PNG
//! or uploaded to the GPU by the live viewer. Every segment is rendered as an
//! anti-aliased capsule, so joins and caps always come out round. A path's
//! segments are merged per pixel before blending, so a translucent stroke
//! never darkens where its own segments meet.

use std::path::Path;

use glam::DVec2;
use image::{ImageResult, Rgba, RgbaImage};

use crate::config::Color;
use crate::surface::{DrawingSurface, LineJoin};
use crate::transform::pixel_extent;

const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` or one of a handful of names.
pub fn parse_color(text: &str) -> Option<Rgba<u8>> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = text.to_ascii_lowercase();
    let functional = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));
    if let Some(args) = functional {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        return match parts[..] {
            [r, g, b] => Some(Rgba([channel(r)?, channel(g)?, channel(b)?, 255])),
            [r, g, b, a] => {
                let alpha = a.parse::<f64>().ok()?.clamp(0.0, 1.0);
                Some(Rgba([
                    channel(r)?,
                    channel(g)?,
                    channel(b)?,
                    (alpha * 255.0).round() as u8,
                ]))
            }
            _ => None,
        };
    }

    let rgb = match lower.as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        "transparent" => return Some(Rgba([0, 0, 0, 0])),
        _ => return None,
    };
    Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    let t = if len2 > 0.0 {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

/// Source-over blend of `src` at `coverage` onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f64) {
    let sa = src.0[3] as f64 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    for c in 0..3 {
        let sc = src.0[c] as f64;
        let dc = dst.0[c] as f64;
        dst.0[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

/// Raster drawing surface backed by an RGBA image.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    background: Rgba<u8>,
    stroke_color: Rgba<u8>,
    line_width: f64,
    line_join: LineJoin,
    subpaths: Vec<Vec<DVec2>>,
}

impl Canvas {
    /// Create a white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), OPAQUE_WHITE),
            background: OPAQUE_WHITE,
            stroke_color: OPAQUE_BLACK,
            line_width: 1.0,
            line_join: LineJoin::Miter,
            subpaths: Vec::new(),
        }
    }

    /// Use `color` for clearing. Unparseable colors keep the current one.
    pub fn with_background(mut self, color: &Color) -> Self {
        if let Some(rgba) = parse_color(color.as_str()) {
            self.background = rgba;
            for pixel in self.image.pixels_mut() {
                *pixel = rgba;
            }
        }
        self
    }

    /// The rendered pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Current line join setting. Strokes are always rendered with round
    /// joins; the setting is kept for callers that query it.
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Write the image as a PNG file.
    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.subpaths
            .iter()
            .flat_map(|path| path.windows(2).map(|w| (w[0], w[1])))
            .filter(|(a, b)| a.is_finite() && b.is_finite())
    }
}

impl DrawingSurface for Canvas {
    fn clear(&mut self, width: f64, height: f64) {
        let (w, h) = pixel_extent(width, height);
        if self.image.dimensions() != (w, h) {
            self.image = RgbaImage::new(w, h);
        }
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    fn set_stroke_color(&mut self, color: &Color) {
        // Like an HTML canvas, ignore colors it cannot parse.
        if let Some(rgba) = parse_color(color.as_str()) {
            self.stroke_color = rgba;
        }
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(vec![DVec2::new(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let point = DVec2::new(x, y);
        match self.subpaths.last_mut() {
            Some(path) => path.push(point),
            None => self.subpaths.push(vec![point]),
        }
    }

    fn stroke(&mut self) {
        let segments: Vec<(DVec2, DVec2)> = self.segments().collect();
        if segments.is_empty() {
            return;
        }

        let half = self.line_width / 2.0;
        let margin = half + 1.0;
        let (mut min, mut max) = (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY));
        for (a, b) in &segments {
            min = min.min(a.min(*b));
            max = max.max(a.max(*b));
        }

        let (width, height) = self.image.dimensions();
        let x0 = (min.x - margin).floor().max(0.0) as u32;
        let y0 = (min.y - margin).floor().max(0.0) as u32;
        let x1 = (max.x + margin).ceil().min(width as f64) as u32;
        let y1 = (max.y + margin).ceil().min(height as f64) as u32;

        let color = self.stroke_color;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = segments
                    .iter()
                    .map(|&(a, b)| distance_to_segment(p, a, b))
                    .fold(f64::INFINITY, f64::min);
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    blend(self.image.get_pixel_mut(x, y), color, coverage);
                }
            }
        }
    }
}
