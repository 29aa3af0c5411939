/// Map listing screen
///
/// Fetches the registered orphanages once on construction and renders
/// them as pins over the map, centered on the fixed home region. A pin
/// opens a popup with the orphanage name and a link to its detail
/// route; the floating button navigates to the registration form.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::text::Shaping;
use iced::widget::{button, canvas, column, container, row, stack, text, vertical_space};
use iced::{color, Element, Length, Size, Task};

use crate::api::{Api, OrphanageSummary};
use crate::map::mercator::{Coordinate, TileId};
use crate::map::tiles;
use crate::map::widget::{Event as MapEvent, Marker, SlippyMap};
use crate::map::MapState;
use crate::route::Route;
use crate::ui::Action;

/// Fixed home region of the listing map (Marau, Rio Grande do Sul)
pub const INITIAL_CENTER: Coordinate = Coordinate {
    latitude: -28.4516617,
    longitude: -52.2025863,
};
pub const INITIAL_ZOOM: u8 = 15;

pub struct OrphanagesMap {
    api: Api,
    map: MapState,
    orphanages: Vec<OrphanageSummary>,
    markers: Vec<Marker>,
    /// Index into `orphanages` of the pin whose popup is open
    selected: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Listing request finished
    Fetched(Result<Vec<OrphanageSummary>, String>),
    /// Interaction with the embedded map
    Map(MapEvent),
    /// A tile download finished
    TileFetched((TileId, Result<Handle, String>)),
    /// The floating "+" button
    CreatePressed,
}

impl OrphanagesMap {
    pub fn new(api: Api, viewport: Size) -> (Self, Task<Message>) {
        let mut screen = Self {
            api,
            map: MapState::new(INITIAL_CENTER, INITIAL_ZOOM, viewport),
            orphanages: Vec::new(),
            markers: Vec::new(),
            selected: None,
        };

        let fetch = {
            let api = screen.api.clone();
            Task::perform(
                async move { api.fetch_orphanages().await.map_err(|e| e.to_string()) },
                Message::Fetched,
            )
        };
        let tiles = screen.request_tiles();

        (screen, Task::batch([fetch, tiles]))
    }

    /// Start downloads for every visible tile not yet requested
    fn request_tiles(&mut self) -> Task<Message> {
        let client = self.api.http_client();
        Task::batch(self.map.missing_tiles().into_iter().map(|tile| {
            Task::perform(tiles::fetch_tile(client.clone(), tile), Message::TileFetched)
        }))
    }

    pub fn update(&mut self, message: Message) -> Action<Message> {
        match message {
            Message::Fetched(Ok(orphanages)) => {
                tracing::info!(count = orphanages.len(), "orphanages loaded");
                self.markers = orphanages
                    .iter()
                    .map(|orphanage| Marker {
                        coordinate: Coordinate::new(orphanage.latitude, orphanage.longitude),
                        label: orphanage.name.clone(),
                    })
                    .collect();
                self.orphanages = orphanages;
                Action::None
            }
            Message::Fetched(Err(error)) => {
                // The listing degrades to an empty map
                tracing::error!(%error, "failed to load orphanages");
                Action::None
            }
            Message::Map(event) => match event {
                MapEvent::MarkerPressed(index) => {
                    self.selected = Some(index);
                    Action::None
                }
                MapEvent::Clicked(_) => {
                    self.selected = None;
                    Action::None
                }
                MapEvent::PopupPressed => match self.selected.and_then(|i| self.orphanages.get(i)) {
                    Some(orphanage) => Action::Navigate(Route::Orphanage(orphanage.id)),
                    None => Action::None,
                },
                event => {
                    self.map.apply(&event);
                    Action::Run(self.request_tiles())
                }
            },
            Message::TileFetched((tile, result)) => {
                self.map.cache.complete(tile, result);
                Action::None
            }
            Message::CreatePressed => Action::Navigate(Route::CreateOrphanage),
        }
    }

    pub fn view(&self) -> Element<Message> {
        let map_canvas: Element<MapEvent> =
            canvas(SlippyMap::browse(&self.map, &self.markers, self.selected))
                .width(Length::Fill)
                .height(Length::Fill)
                .into();

        let create = container(
            button(
                text("+")
                    .size(26)
                    .color(color!(0xffffff))
                    .shaping(Shaping::Advanced),
            )
            .padding([6, 18])
            .style(|_theme, _status| button::Style {
                background: Some(color!(0x15c3d6).into()),
                border: iced::Border {
                    radius: 16.0.into(),
                    ..iced::Border::default()
                },
                ..button::Style::default()
            })
            .on_press(Message::CreatePressed),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Right)
        .align_y(Vertical::Bottom)
        .padding(32);

        let map_area = stack![map_canvas.map(Message::Map), create];

        row![self.aside(), map_area].into()
    }

    fn aside(&self) -> Element<Message> {
        let header = column![
            text("🗺").size(40).shaping(Shaping::Advanced),
            text("Escolha um orfanato no mapa")
                .size(28)
                .color(color!(0xffffff)),
            text("Muitas crianças estão esperando a sua visita :)")
                .size(16)
                .color(color!(0xffffff))
                .shaping(Shaping::Advanced),
        ]
        .spacing(16);

        let footer = column![
            text("Marau").size(18).color(color!(0xffffff)),
            text("Rio Grande do Sul").size(14).color(color!(0xffffff)),
        ]
        .spacing(4);

        container(column![header, vertical_space(), footer])
            .width(300)
            .height(Length::Fill)
            .padding(40)
            .style(|_theme| container::Style {
                background: Some(color!(0x29b6d1).into()),
                ..container::Style::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> OrphanagesMap {
        let (screen, _task) = OrphanagesMap::new(
            Api::new("http://localhost:0".to_string()),
            Size::new(800.0, 600.0),
        );
        screen
    }

    #[test]
    fn test_listing_becomes_markers_in_order() {
        let mut screen = screen();
        screen.update(Message::Fetched(Ok(vec![OrphanageSummary {
            id: 1,
            latitude: 1.0,
            longitude: 2.0,
            name: "X".to_string(),
        }])));

        assert_eq!(screen.markers.len(), 1);
        assert_eq!(screen.markers[0].coordinate, Coordinate::new(1.0, 2.0));
        assert_eq!(screen.markers[0].label, "X");
    }

    #[test]
    fn test_failed_fetch_leaves_zero_markers() {
        let mut screen = screen();
        screen.update(Message::Fetched(Err("connection refused".to_string())));

        assert!(screen.orphanages.is_empty());
        assert!(screen.markers.is_empty());
    }

    #[test]
    fn test_popup_link_navigates_to_the_detail_route() {
        let mut screen = screen();
        screen.update(Message::Fetched(Ok(vec![OrphanageSummary {
            id: 1,
            latitude: 1.0,
            longitude: 2.0,
            name: "X".to_string(),
        }])));

        screen.update(Message::Map(MapEvent::MarkerPressed(0)));
        match screen.update(Message::Map(MapEvent::PopupPressed)) {
            Action::Navigate(route) => assert_eq!(route.path(), "/orphanage/1"),
            _ => panic!("expected navigation to the detail route"),
        }
    }

    #[test]
    fn test_plain_map_click_closes_the_popup() {
        let mut screen = screen();
        screen.update(Message::Fetched(Ok(vec![OrphanageSummary {
            id: 1,
            latitude: 1.0,
            longitude: 2.0,
            name: "X".to_string(),
        }])));

        screen.update(Message::Map(MapEvent::MarkerPressed(0)));
        assert_eq!(screen.selected, Some(0));

        screen.update(Message::Map(MapEvent::Clicked(Coordinate::new(0.0, 0.0))));
        assert_eq!(screen.selected, None);
    }
}
