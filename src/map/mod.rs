/// Interactive map module
///
/// This module provides the embedded slippy map used by both pages:
/// - Web Mercator conversions (mercator.rs)
/// - Tile downloads and the per-view tile cache (tiles.rs)
/// - The canvas widget, markers and mouse interaction (widget.rs)

pub mod mercator;
pub mod tiles;
pub mod widget;

use iced::Size;

use mercator::{Coordinate, TileId, MAX_ZOOM, MIN_ZOOM};
use tiles::TileCache;

/// Viewing state of one embedded map
///
/// Each screen owns its own `MapState` (and therefore its own tile
/// cache); nothing is shared across screens.
#[derive(Debug)]
pub struct MapState {
    pub center: Coordinate,
    pub zoom: u8,
    /// Last known widget size, used to decide which tiles to request
    pub viewport: Size,
    pub cache: TileCache,
}

impl MapState {
    pub fn new(center: Coordinate, zoom: u8, viewport: Size) -> Self {
        Self {
            center,
            zoom,
            viewport,
            cache: TileCache::new(),
        }
    }

    /// Apply a pan or zoom interaction; other events leave the view as-is
    pub fn apply(&mut self, event: &widget::Event) {
        match *event {
            widget::Event::Panned { dx, dy, viewport } => {
                self.viewport = viewport;
                self.center = mercator::pan(self.center, self.zoom, f64::from(dx), f64::from(dy));
            }
            widget::Event::Zoomed { steps, cursor, viewport } => {
                self.viewport = viewport;
                let target = (i16::from(self.zoom) + i16::from(steps))
                    .clamp(i16::from(MIN_ZOOM), i16::from(MAX_ZOOM)) as u8;
                if target != self.zoom {
                    self.center =
                        mercator::zoom_about(self.center, self.zoom, target, cursor, viewport);
                    self.zoom = target;
                }
            }
            _ => {}
        }
    }

    /// Visible tiles not yet requested, marked in flight as a side effect
    pub fn missing_tiles(&mut self) -> Vec<TileId> {
        mercator::visible_tiles(self.center, self.zoom, self.viewport)
            .into_iter()
            .filter(|tile| self.cache.begin(*tile))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Point;

    fn state() -> MapState {
        MapState::new(Coordinate::new(-28.45, -52.20), 15, Size::new(800.0, 600.0))
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut map = state();
        map.zoom = MAX_ZOOM;
        map.apply(&widget::Event::Zoomed {
            steps: 1,
            cursor: Point::new(400.0, 300.0),
            viewport: Size::new(800.0, 600.0),
        });
        assert_eq!(map.zoom, MAX_ZOOM);

        map.zoom = MIN_ZOOM;
        map.apply(&widget::Event::Zoomed {
            steps: -1,
            cursor: Point::new(400.0, 300.0),
            viewport: Size::new(800.0, 600.0),
        });
        assert_eq!(map.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_missing_tiles_are_reported_once() {
        let mut map = state();
        let first = map.missing_tiles();
        assert!(!first.is_empty());

        // Nothing changed, so nothing new to request
        assert!(map.missing_tiles().is_empty());
    }

    #[test]
    fn test_click_events_do_not_move_the_view() {
        let mut map = state();
        let before = (map.center, map.zoom);
        map.apply(&widget::Event::Clicked(Coordinate::new(1.0, 2.0)));
        map.apply(&widget::Event::MarkerPressed(0));
        assert_eq!((map.center, map.zoom), before);
    }
}
