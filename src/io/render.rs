//! PNG rendering of a reconstructed route
//!
//! Layout coordinates are fitted into the image with a uniform scale and Y
//! pointing up. Crossover lines are drawn as faint horizontal guides, hops as
//! blue polylines, stops as dots, and the first/last stop as green/red markers.

use crate::domain::Point;
use crate::error::Result;
use crate::infra::config::RenderConfig;
use crate::services::route::RoutePlan;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use std::path::Path;
use tracing::{info, warn};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GUIDE: Rgba<u8> = Rgba([220, 220, 220, 255]);
const PATH: Rgba<u8> = Rgba([30, 90, 200, 255]);
const STOP: Rgba<u8> = Rgba([40, 40, 40, 255]);
const START: Rgba<u8> = Rgba([20, 160, 60, 255]);
const END: Rgba<u8> = Rgba([200, 30, 30, 255]);

/// Maps layout coordinates to pixel positions
#[derive(Debug, Clone, Copy)]
struct Projection {
    min_x: f64,
    min_y: f64,
    scale: f64,
    height: f64,
    margin: f64,
}

impl Projection {
    fn fit(points: &[Point], config: &RenderConfig) -> Self {
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if points.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 1.0, 1.0);
        }

        let margin = f64::from(config.margin);
        let usable_w = (f64::from(config.width) - 2.0 * margin).max(1.0);
        let usable_h = (f64::from(config.height) - 2.0 * margin).max(1.0);
        let span_x = (max_x - min_x).max(1.0);
        let span_y = (max_y - min_y).max(1.0);

        Self {
            min_x,
            min_y,
            scale: (usable_w / span_x).min(usable_h / span_y),
            height: f64::from(config.height),
            margin,
        }
    }

    fn to_px(&self, p: Point) -> (f32, f32) {
        let x = self.margin + (p.x - self.min_x) * self.scale;
        let y = self.height - self.margin - (p.y - self.min_y) * self.scale;
        (x as f32, y as f32)
    }

    fn to_px_i32(&self, p: Point) -> (i32, i32) {
        let (x, y) = self.to_px(p);
        (x.round() as i32, y.round() as i32)
    }
}

pub struct RouteRenderer<'a> {
    config: &'a RenderConfig,
    crossover_y: &'a [f64],
}

impl<'a> RouteRenderer<'a> {
    pub fn new(config: &'a RenderConfig, crossover_y: &'a [f64]) -> Self {
        Self { config, crossover_y }
    }

    /// Draw the route into an in-memory image
    pub fn draw(&self, plan: &RoutePlan) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(self.config.width, self.config.height, BACKGROUND);

        let mut extent: Vec<Point> = plan.polyline();
        extent.extend(plan.stops.iter().filter_map(|s| s.coord));
        if extent.is_empty() {
            warn!(trip = %plan.trip, "route_has_no_coordinates");
            return img;
        }
        let proj = Projection::fit(&extent, self.config);

        let (min_y, max_y) = extent
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let right = self.config.width.saturating_sub(self.config.margin) as f32;
        for &y in self.crossover_y.iter().filter(|&&y| y >= min_y && y <= max_y) {
            let (_, py) = proj.to_px(Point::new(0.0, y));
            draw_line_segment_mut(&mut img, (self.config.margin as f32, py), (right, py), GUIDE);
        }

        for hop in &plan.hops {
            for seg in hop.waypoints.windows(2) {
                let (a, b) = (proj.to_px(seg[0]), proj.to_px(seg[1]));
                // 3px stroke
                for d in [-1.0f32, 0.0, 1.0] {
                    draw_line_segment_mut(&mut img, (a.0 + d, a.1), (b.0 + d, b.1), PATH);
                    draw_line_segment_mut(&mut img, (a.0, a.1 + d), (b.0, b.1 + d), PATH);
                }
            }
        }

        for coord in plan.stops.iter().filter_map(|s| s.coord) {
            draw_filled_circle_mut(&mut img, proj.to_px_i32(coord), 3, STOP);
        }
        if let Some(start) = plan.start {
            draw_filled_circle_mut(&mut img, proj.to_px_i32(start), 8, START);
        }
        if let Some(end) = plan.end {
            draw_filled_circle_mut(&mut img, proj.to_px_i32(end), 8, END);
            draw_hollow_circle_mut(&mut img, proj.to_px_i32(end), 10, END);
        }

        img
    }

    /// Draw the route and save it as PNG
    pub fn render_to_file(&self, plan: &RoutePlan, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.draw(plan).save(path)?;
        info!(path = %path.display(), title = %plan.title, "route_image_written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemId, SlotId, TripId};
    use crate::services::route::{RouteHop, RouteStop};

    fn plan() -> RoutePlan {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 2000.0);
        RoutePlan {
            trip: TripId("T1".into()),
            category: "Cart".into(),
            title: "Longest trip T1".into(),
            total_distance: 175.0,
            stops: vec![
                RouteStop {
                    item: ItemId("a".into()),
                    slot: Some(SlotId("A1".into())),
                    pick_seq: Some(1),
                    coord: Some(a),
                },
                RouteStop {
                    item: ItemId("b".into()),
                    slot: Some(SlotId("B1".into())),
                    pick_seq: Some(2),
                    coord: Some(b),
                },
            ],
            hops: vec![RouteHop {
                from: SlotId("A1".into()),
                to: SlotId("B1".into()),
                crossover_y: Some(109.0),
                distance: 175.0,
                waypoints: vec![a, Point::new(0.0, 109.0), Point::new(100.0, 109.0), b],
            }],
            start: Some(a),
            end: Some(b),
        }
    }

    #[test]
    fn test_projection_corners() {
        let config = RenderConfig { enabled: true, width: 200, height: 200, margin: 10 };
        let proj =
            Projection::fit(&[Point::new(0.0, 0.0), Point::new(100.0, 100.0)], &config);
        assert_eq!(proj.to_px(Point::new(0.0, 0.0)), (10.0, 190.0));
        assert_eq!(proj.to_px(Point::new(100.0, 100.0)), (190.0, 10.0));
    }

    #[test]
    fn test_draw_marks_start_and_end() {
        let config = RenderConfig { enabled: true, width: 300, height: 600, margin: 20 };
        let lines = [109.0, 1895.0];
        let renderer = RouteRenderer::new(&config, &lines);
        let plan = plan();
        let img = renderer.draw(&plan);

        let proj = Projection::fit(&plan.polyline(), &config);
        let (sx, sy) = proj.to_px_i32(plan.start.unwrap());
        let (ex, ey) = proj.to_px_i32(plan.end.unwrap());
        assert_eq!(*img.get_pixel(sx as u32, sy as u32), START);
        assert_eq!(*img.get_pixel(ex as u32, ey as u32), END);
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = RenderConfig { enabled: true, width: 120, height: 160, margin: 8 };
        let path = dir.path().join("route.png");
        RouteRenderer::new(&config, &[109.0]).render_to_file(&plan(), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
