use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Map, MapResolution, Points};
use ratatui::widgets::Block;
use ratatui::Frame;
use tariff_core::map::{ChoroplethChart, MapFeature};

use crate::ui::widgets::palette::{fill_color, to_color};

const MARKER_RADIUS_DEG: f64 = 3.0;
const MARKER_STEP_DEG: f64 = 0.75;

/// Converts a terminal cell inside `area` to a lon/lat position.
pub fn cell_to_lon_lat(area: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }

    let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
    Some((x.mul_add(360.0, -180.0), y.mul_add(-180.0, 90.0)))
}

/// Filled disc of points around a country centroid.
fn marker_points(feature: &MapFeature) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    let mut dx = -MARKER_RADIUS_DEG;
    while dx <= MARKER_RADIUS_DEG {
        let mut dy = -MARKER_RADIUS_DEG;
        while dy <= MARKER_RADIUS_DEG {
            if dx.hypot(dy) <= MARKER_RADIUS_DEG {
                points.push((feature.lon + dx, feature.lat + dy));
            }
            dy += MARKER_STEP_DEG;
        }
        dx += MARKER_STEP_DEG;
    }
    points
}

/// Draws the chart and returns the inner canvas area for hit-testing.
pub fn render_world_map(f: &mut Frame<'_>, area: Rect, chart: &ChoroplethChart, block: Block<'_>) -> Rect {
    let inner = block.inner(area);
    let theme = chart.theme();
    let background = theme.background;
    let outline = to_color(theme.outline);
    let highlight = to_color(theme.highlight);

    let markers: Vec<(Vec<(f64, f64)>, Color)> = chart
        .scene()
        .features
        .iter()
        .map(|feature| (marker_points(feature), fill_color(feature.fill, background)))
        .collect();
    let hovered = chart.hovered_feature().map(|feature| (feature.lon, feature.lat, feature.name.clone()));

    let canvas = Canvas::default()
        .block(block)
        .background_color(to_color(background))
        .marker(Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: outline,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for (points, color) in &markers {
                ctx.draw(&Points {
                    coords: points.as_slice(),
                    color: *color,
                });
            }

            if let Some((lon, lat, name)) = &hovered {
                ctx.draw(&Circle {
                    x: *lon,
                    y: *lat,
                    radius: MARKER_RADIUS_DEG + 1.5,
                    color: highlight,
                });
                ctx.print(
                    *lon,
                    (lat + 8.0).min(85.0),
                    Span::styled(name.clone(), Style::default().fg(Color::White)),
                );
            }
        });

    f.render_widget(canvas, area);
    inner
}
