/// Web Mercator math
///
/// Pure coordinate conversions for the slippy map: geographic
/// coordinates to world pixels at an integer zoom level, world pixels
/// back to coordinates, screen-space conversions relative to a map
/// center, and the set of 256-pixel tiles covering a viewport.

use iced::{Point, Size};
use std::f64::consts::PI;

/// Side length of a map tile in pixels
pub const TILE_SIZE: f64 = 256.0;

/// Zoom bounds for the map widget
pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 18;

/// Latitude limit of the Mercator projection
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Identifies one tile of the world at a zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

/// Width (and height) of the whole world in pixels at `zoom`
fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom)
}

/// Project a coordinate to world-pixel space at `zoom`
///
/// `(0, 0)` is the top-left of the world (latitude +85.05, longitude
/// -180); latitudes outside the Mercator domain are clamped.
pub fn project(coordinate: Coordinate, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let latitude = coordinate
        .latitude
        .clamp(-MAX_LATITUDE, MAX_LATITUDE)
        .to_radians();

    let x = (coordinate.longitude + 180.0) / 360.0 * size;
    let y = (1.0 - ((latitude.tan() + 1.0 / latitude.cos()).ln()) / PI) / 2.0 * size;

    (x, y)
}

/// Inverse of [`project`]
pub fn unproject(x: f64, y: f64, zoom: u8) -> Coordinate {
    let size = world_size(zoom);

    let longitude = x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * y / size);
    let latitude = n.sinh().atan().to_degrees();

    Coordinate::new(latitude, longitude)
}

/// Convert a point on screen to the coordinate under it
///
/// `center` is the coordinate rendered at the middle of a viewport of
/// `viewport` logical pixels.
pub fn screen_to_coordinate(
    center: Coordinate,
    zoom: u8,
    viewport: Size,
    point: Point,
) -> Coordinate {
    let (cx, cy) = project(center, zoom);
    let x = cx - f64::from(viewport.width) / 2.0 + f64::from(point.x);
    let y = cy - f64::from(viewport.height) / 2.0 + f64::from(point.y);
    unproject(x, y, zoom)
}

/// Convert a coordinate to its position on screen
pub fn coordinate_to_screen(
    center: Coordinate,
    zoom: u8,
    viewport: Size,
    coordinate: Coordinate,
) -> Point {
    let (cx, cy) = project(center, zoom);
    let (x, y) = project(coordinate, zoom);
    Point::new(
        (x - cx + f64::from(viewport.width) / 2.0) as f32,
        (y - cy + f64::from(viewport.height) / 2.0) as f32,
    )
}

/// New center after dragging the map by `(dx, dy)` screen pixels
///
/// The content follows the cursor, so the center moves the opposite way.
pub fn pan(center: Coordinate, zoom: u8, dx: f64, dy: f64) -> Coordinate {
    let (cx, cy) = project(center, zoom);
    unproject(cx - dx, cy - dy, zoom)
}

/// New center after zooming from `zoom` to `new_zoom` with the cursor at
/// `cursor`, such that the coordinate under the cursor stays put
pub fn zoom_about(
    center: Coordinate,
    zoom: u8,
    new_zoom: u8,
    cursor: Point,
    viewport: Size,
) -> Coordinate {
    let (cx, cy) = project(center, zoom);
    let offset_x = f64::from(cursor.x) - f64::from(viewport.width) / 2.0;
    let offset_y = f64::from(cursor.y) - f64::from(viewport.height) / 2.0;

    let factor = world_size(new_zoom) / world_size(zoom);
    let new_cx = (cx + offset_x) * factor - offset_x;
    let new_cy = (cy + offset_y) * factor - offset_y;

    unproject(new_cx, new_cy, new_zoom)
}

/// Tiles covering a viewport centered on `center` at `zoom`
///
/// Indices are clamped to the `0..2^zoom` grid, so near the poles (or at
/// low zoom) fewer tiles than the viewport area may be returned.
pub fn visible_tiles(center: Coordinate, zoom: u8, viewport: Size) -> Vec<TileId> {
    let max_index = i64::from((1u32 << zoom) - 1);
    let (cx, cy) = project(center, zoom);

    let left = cx - f64::from(viewport.width) / 2.0;
    let top = cy - f64::from(viewport.height) / 2.0;
    let right = left + f64::from(viewport.width);
    let bottom = top + f64::from(viewport.height);

    let first_x = (left / TILE_SIZE).floor() as i64;
    let last_x = (right / TILE_SIZE).ceil() as i64 - 1;
    let first_y = (top / TILE_SIZE).floor() as i64;
    let last_y = (bottom / TILE_SIZE).ceil() as i64 - 1;

    let mut tiles = Vec::new();
    for y in first_y.max(0)..=last_y.min(max_index) {
        for x in first_x.max(0)..=last_x.min(max_index) {
            tiles.push(TileId {
                zoom,
                x: x as u32,
                y: y as u32,
            });
        }
    }

    tiles
}

/// Screen position of a tile's top-left corner
pub fn tile_screen_origin(center: Coordinate, zoom: u8, viewport: Size, tile: TileId) -> Point {
    let (cx, cy) = project(center, zoom);
    let left = cx - f64::from(viewport.width) / 2.0;
    let top = cy - f64::from(viewport.height) / 2.0;

    Point::new(
        (f64::from(tile.x) * TILE_SIZE - left) as f32,
        (f64::from(tile.y) * TILE_SIZE - top) as f32,
    )
}
