/// Slippy map canvas widget
///
/// Draws the tile layer, pin markers and the name popup, and translates
/// mouse input into map events: drag to pan, wheel to zoom, and a plain
/// click (below the drag threshold) to either pick a location or hit a
/// marker, depending on the page.

use iced::alignment::{Horizontal, Vertical};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Text};
use iced::widget::text::Shaping;
use iced::{color, Color, Point, Rectangle, Renderer, Size, Theme};

use super::mercator::{self, Coordinate, TILE_SIZE};
use super::MapState;

/// Movement below this many pixels is a click, not a drag
const DRAG_THRESHOLD: f32 = 3.0;

/// Press within this distance of a pin body selects its marker
const MARKER_HIT_RADIUS: f32 = 16.0;

/// The pin body is a circle floating this far above its anchor point
const PIN_LIFT: f32 = 22.0;
const PIN_RADIUS: f32 = 12.0;

const POPUP_WIDTH: f32 = 240.0;
const POPUP_HEIGHT: f32 = 44.0;

/// Interactions reported by the widget
#[derive(Debug, Clone)]
pub enum Event {
    /// A plain click on the map, with the coordinate under the cursor
    Clicked(Coordinate),
    /// A click on the marker at this index of the marker list
    MarkerPressed(usize),
    /// A click on the open popup (the detail link)
    PopupPressed,
    /// The map was dragged by this many screen pixels
    Panned { dx: f32, dy: f32, viewport: Size },
    /// The wheel moved; positive steps zoom in at the cursor
    Zoomed { steps: i8, cursor: Point, viewport: Size },
}

/// A pin on the map
#[derive(Debug, Clone)]
pub struct Marker {
    pub coordinate: Coordinate,
    /// Shown in the popup when the marker is selected
    pub label: String,
}

/// The canvas program rendering one embedded map
pub struct SlippyMap<'a> {
    state: &'a MapState,
    markers: &'a [Marker],
    selected: Option<usize>,
    markers_interactive: bool,
}

impl<'a> SlippyMap<'a> {
    /// Browsing map: markers are clickable and open a popup
    pub fn browse(state: &'a MapState, markers: &'a [Marker], selected: Option<usize>) -> Self {
        Self {
            state,
            markers,
            selected,
            markers_interactive: true,
        }
    }

    /// Location picker: any click reports a coordinate, markers are inert
    pub fn picker(state: &'a MapState, markers: &'a [Marker]) -> Self {
        Self {
            state,
            markers,
            selected: None,
            markers_interactive: false,
        }
    }

    fn anchor(&self, index: usize, viewport: Size) -> Point {
        mercator::coordinate_to_screen(
            self.state.center,
            self.state.zoom,
            viewport,
            self.markers[index].coordinate,
        )
    }

    fn popup_rect(anchor: Point) -> Rectangle {
        Rectangle {
            x: anchor.x - POPUP_WIDTH / 2.0,
            y: anchor.y - PIN_LIFT - PIN_RADIUS - POPUP_HEIGHT - 8.0,
            width: POPUP_WIDTH,
            height: POPUP_HEIGHT,
        }
    }

    /// What a non-drag release at `position` means
    fn click_event(&self, position: Point, viewport: Size) -> Event {
        if self.markers_interactive {
            if let Some(index) = self.selected {
                if index < self.markers.len() {
                    let anchor = self.anchor(index, viewport);
                    if Self::popup_rect(anchor).contains(position) {
                        return Event::PopupPressed;
                    }
                }
            }

            for index in 0..self.markers.len() {
                let anchor = self.anchor(index, viewport);
                let body = Point::new(anchor.x, anchor.y - PIN_LIFT);
                if position.distance(body) <= MARKER_HIT_RADIUS {
                    return Event::MarkerPressed(index);
                }
            }
        }

        Event::Clicked(mercator::screen_to_coordinate(
            self.state.center,
            self.state.zoom,
            viewport,
            position,
        ))
    }

    fn draw_marker(&self, frame: &mut canvas::Frame, anchor: Point) {
        let pin = color!(0x15b6d6);
        let body = Point::new(anchor.x, anchor.y - PIN_LIFT);

        // Stem from the body down to the anchored coordinate
        let stem = Path::new(|b| {
            b.move_to(Point::new(body.x - 6.0, body.y + 8.0));
            b.line_to(Point::new(body.x + 6.0, body.y + 8.0));
            b.line_to(anchor);
            b.close();
        });
        frame.fill(&stem, pin);

        frame.fill(&Path::circle(body, PIN_RADIUS), pin);
        frame.fill(&Path::circle(body, 4.5), Color::WHITE);
    }

    fn draw_popup(&self, frame: &mut canvas::Frame, anchor: Point, label: &str) {
        let rect = Self::popup_rect(anchor);
        let background = Path::rounded_rectangle(
            Point::new(rect.x, rect.y),
            Size::new(rect.width, rect.height),
            8.0.into(),
        );
        frame.fill(&background, Color::WHITE);

        frame.fill_text(Text {
            content: label.to_string(),
            position: Point::new(rect.x + 16.0, rect.center_y()),
            color: color!(0x0089a5),
            size: 15.0.into(),
            horizontal_alignment: Horizontal::Left,
            vertical_alignment: Vertical::Center,
            shaping: Shaping::Advanced,
            ..Text::default()
        });

        // Detail link affordance
        frame.fill_text(Text {
            content: "→".to_string(),
            position: Point::new(rect.x + rect.width - 16.0, rect.center_y()),
            color: color!(0x15b6d6),
            size: 18.0.into(),
            horizontal_alignment: Horizontal::Right,
            vertical_alignment: Vertical::Center,
            shaping: Shaping::Advanced,
            ..Text::default()
        });
    }
}

/// Mouse interaction state between canvas events
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag: Option<Drag>,
}

#[derive(Debug, Clone)]
struct Drag {
    origin: Point,
    last: Point,
    moved: bool,
}

impl canvas::Program<Event> for SlippyMap<'_> {
    type State = Interaction;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let viewport = bounds.size();

        // Background where tiles are missing or still loading
        frame.fill_rectangle(Point::ORIGIN, viewport, color!(0xebf2f5));

        for tile in mercator::visible_tiles(self.state.center, self.state.zoom, viewport) {
            if let Some(handle) = self.state.cache.handle(tile) {
                let origin =
                    mercator::tile_screen_origin(self.state.center, self.state.zoom, viewport, tile);
                frame.draw_image(
                    Rectangle::new(origin, Size::new(TILE_SIZE as f32, TILE_SIZE as f32)),
                    canvas::Image::new(handle.clone()),
                );
            }
        }

        for index in 0..self.markers.len() {
            self.draw_marker(&mut frame, self.anchor(index, viewport));
        }

        if let Some(index) = self.selected {
            if index < self.markers.len() {
                self.draw_popup(
                    &mut frame,
                    self.anchor(index, viewport),
                    &self.markers[index].label,
                );
            }
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Event>) {
        match event {
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if let Some(position) = cursor.position_in(bounds) {
                    let y = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y,
                        mouse::ScrollDelta::Pixels { y, .. } => y,
                    };
                    if y != 0.0 {
                        let steps = if y > 0.0 { 1 } else { -1 };
                        return (
                            canvas::event::Status::Captured,
                            Some(Event::Zoomed {
                                steps,
                                cursor: position,
                                viewport: bounds.size(),
                            }),
                        );
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.drag = Some(Drag {
                        origin: position,
                        last: position,
                        moved: false,
                    });
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let Some(drag) = &mut state.drag {
                    if let Some(position) = cursor.position_in(bounds) {
                        if !drag.moved && position.distance(drag.origin) > DRAG_THRESHOLD {
                            drag.moved = true;
                        }

                        if drag.moved {
                            let dx = position.x - drag.last.x;
                            let dy = position.y - drag.last.y;
                            drag.last = position;
                            return (
                                canvas::event::Status::Captured,
                                Some(Event::Panned {
                                    dx,
                                    dy,
                                    viewport: bounds.size(),
                                }),
                            );
                        }

                        drag.last = position;
                        return (canvas::event::Status::Captured, None);
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if let Some(drag) = state.drag.take() {
                    if !drag.moved {
                        return (
                            canvas::event::Status::Captured,
                            Some(self.click_event(drag.origin, bounds.size())),
                        );
                    }
                    return (canvas::event::Status::Captured, None);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.drag.as_ref().is_some_and(|drag| drag.moved) {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_state() -> MapState {
        MapState::new(Coordinate::new(-28.45, -52.20), 15, Size::new(800.0, 600.0))
    }

    fn markers() -> Vec<Marker> {
        vec![Marker {
            coordinate: Coordinate::new(-28.45, -52.20),
            label: "Lar das Meninas".to_string(),
        }]
    }

    #[test]
    fn test_click_on_marker_selects_it() {
        let state = map_state();
        let markers = markers();
        let map = SlippyMap::browse(&state, &markers, None);
        let viewport = Size::new(800.0, 600.0);

        // The marker sits at the view center; its body floats above the anchor
        let body = Point::new(400.0, 300.0 - PIN_LIFT);
        match map.click_event(body, viewport) {
            Event::MarkerPressed(0) => {}
            other => panic!("expected MarkerPressed, got {:?}", other),
        }
    }

    #[test]
    fn test_click_away_from_markers_reports_a_coordinate() {
        let state = map_state();
        let markers = markers();
        let map = SlippyMap::browse(&state, &markers, None);

        match map.click_event(Point::new(100.0, 100.0), Size::new(800.0, 600.0)) {
            Event::Clicked(coordinate) => {
                assert!(coordinate.latitude > -28.45);
                assert!(coordinate.longitude < -52.20);
            }
            other => panic!("expected Clicked, got {:?}", other),
        }
    }

    #[test]
    fn test_picker_ignores_markers() {
        let state = map_state();
        let markers = markers();
        let map = SlippyMap::picker(&state, &markers);

        let body = Point::new(400.0, 300.0 - PIN_LIFT);
        match map.click_event(body, Size::new(800.0, 600.0)) {
            Event::Clicked(_) => {}
            other => panic!("expected Clicked, got {:?}", other),
        }
    }

    #[test]
    fn test_click_on_open_popup_hits_the_link() {
        let state = map_state();
        let markers = markers();
        let map = SlippyMap::browse(&state, &markers, Some(0));
        let viewport = Size::new(800.0, 600.0);

        let anchor = Point::new(400.0, 300.0);
        let popup = SlippyMap::popup_rect(anchor);
        let inside = Point::new(popup.center_x(), popup.center_y());

        match map.click_event(inside, viewport) {
            Event::PopupPressed => {}
            other => panic!("expected PopupPressed, got {:?}", other),
        }
    }
}
