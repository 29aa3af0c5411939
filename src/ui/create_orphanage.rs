/// Registration form screen
///
/// Two sections: location and photos, then visiting details. The
/// location is picked by clicking the embedded map (last click wins),
/// photos come from the native multi-file picker and render as a
/// preview grid, and submission posts everything as one multipart
/// request. Success shows a blocking confirmation and navigates back
/// to the listing; failure only reaches the log.

use iced::alignment::Horizontal;
use iced::widget::image::Handle;
use iced::widget::text::Shaping;
use iced::widget::{
    button, canvas, column, container, horizontal_rule, image as preview_image, row, scrollable,
    text, text_input,
};
use iced::{color, Element, Length, Size, Task};
use rfd::FileDialog;

use crate::api::Api;
use crate::map::mercator::TileId;
use crate::map::tiles;
use crate::map::widget::{Event as MapEvent, Marker, SlippyMap};
use crate::map::MapState;
use crate::route::Route;
use crate::state::draft::{OrphanageDraft, MAX_ABOUT_LEN};
use crate::state::gallery::{self, Gallery, Photo};
use crate::ui::{sidebar, Action};

use super::orphanages_map::{INITIAL_CENTER, INITIAL_ZOOM};

pub struct CreateOrphanage {
    api: Api,
    map: MapState,
    draft: OrphanageDraft,
    gallery: Gallery,
    /// Zero or one pin, mirroring the picked position
    markers: Vec<Marker>,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Interaction with the picker map
    Map(MapEvent),
    /// A tile download finished
    TileFetched((TileId, Result<Handle, String>)),
    /// The sidebar back affordance
    BackPressed,
    NameChanged(String),
    AboutChanged(String),
    InstructionsChanged(String),
    OpeningHoursChanged(String),
    /// Both weekend buttons land here, with their value
    OpenOnWeekendsChanged(bool),
    /// The "+" tile of the photo grid
    AddPhotosPressed,
    /// Picked files finished loading and decoding
    PhotosLoaded(Vec<Photo>),
    SubmitPressed,
    /// Registration request finished
    Submitted(Result<(), String>),
}

impl CreateOrphanage {
    pub fn new(api: Api, viewport: Size) -> (Self, Task<Message>) {
        let mut screen = Self {
            api,
            map: MapState::new(INITIAL_CENTER, INITIAL_ZOOM, viewport),
            draft: OrphanageDraft::new(),
            gallery: Gallery::new(),
            markers: Vec::new(),
        };

        let tiles = screen.request_tiles();
        (screen, tiles)
    }

    fn request_tiles(&mut self) -> Task<Message> {
        let client = self.api.http_client();
        Task::batch(self.map.missing_tiles().into_iter().map(|tile| {
            Task::perform(tiles::fetch_tile(client.clone(), tile), Message::TileFetched)
        }))
    }

    pub fn update(&mut self, message: Message) -> Action<Message> {
        match message {
            Message::Map(MapEvent::Clicked(coordinate)) => {
                self.draft.set_position(coordinate);
                self.markers = vec![Marker {
                    coordinate,
                    label: String::new(),
                }];
                Action::None
            }
            Message::Map(MapEvent::MarkerPressed(_)) | Message::Map(MapEvent::PopupPressed) => {
                // The picked pin is not interactive
                Action::None
            }
            Message::Map(event) => {
                self.map.apply(&event);
                Action::Run(self.request_tiles())
            }
            Message::TileFetched((tile, result)) => {
                self.map.cache.complete(tile, result);
                Action::None
            }
            Message::BackPressed => Action::Navigate(Route::OrphanagesMap),
            Message::NameChanged(value) => {
                self.draft.set_name(value);
                Action::None
            }
            Message::AboutChanged(value) => {
                self.draft.set_about(value);
                Action::None
            }
            Message::InstructionsChanged(value) => {
                self.draft.set_instructions(value);
                Action::None
            }
            Message::OpeningHoursChanged(value) => {
                self.draft.set_opening_hours(value);
                Action::None
            }
            Message::OpenOnWeekendsChanged(value) => {
                self.draft.set_open_on_weekends(value);
                Action::None
            }
            Message::AddPhotosPressed => {
                // Native picker; no file-type or size validation
                let picked = FileDialog::new().set_title("Selecione as fotos").pick_files();

                match picked {
                    Some(paths) => {
                        Action::Run(Task::perform(gallery::load_photos(paths), Message::PhotosLoaded))
                    }
                    None => Action::None,
                }
            }
            Message::PhotosLoaded(photos) => {
                self.gallery.replace(photos);
                Action::None
            }
            Message::SubmitPressed => {
                let api = self.api.clone();
                let draft = self.draft.clone();
                let photos = self.gallery.photos().to_vec();

                Action::Run(Task::perform(
                    async move {
                        api.create_orphanage(&draft, &photos)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::Submitted,
                ))
            }
            Message::Submitted(Ok(())) => {
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Info)
                    .set_title("Happy")
                    .set_description("Cadastro realizado com sicesso")
                    .show();

                Action::Navigate(Route::OrphanagesMap)
            }
            Message::Submitted(Err(error)) => {
                // No user feedback on failure; the form stays as filled
                tracing::error!(%error, "registration failed");
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<Message> {
        let form = column![
            self.location_section(),
            self.visiting_section(),
            button(
                text("Confirmar")
                    .size(18)
                    .color(color!(0xffffff))
                    .width(Length::Fill)
                    .align_x(Horizontal::Center),
            )
            .width(Length::Fill)
            .padding(16)
            .style(|_theme, _status| button::Style {
                background: Some(color!(0x3cdc8c).into()),
                border: iced::Border {
                    radius: 16.0.into(),
                    ..iced::Border::default()
                },
                ..button::Style::default()
            })
            .on_press(Message::SubmitPressed),
        ]
        .spacing(32)
        .max_width(700);

        let sheet = container(form)
            .width(Length::Fill)
            .padding(48)
            .align_x(Horizontal::Center);

        row![
            sidebar::sidebar(Message::BackPressed),
            scrollable(sheet).width(Length::Fill).height(Length::Fill),
        ]
        .into()
    }

    /// First fieldset: the picker map, name, about and photos
    fn location_section(&self) -> Element<Message> {
        let map_canvas: Element<MapEvent> = canvas(SlippyMap::picker(&self.map, &self.markers))
            .width(Length::Fill)
            .height(280)
            .into();

        let mut photo_tiles: Vec<Element<Message>> = self
            .gallery
            .previews()
            .map(|preview| {
                preview_image(preview.clone())
                    .width(96)
                    .height(96)
                    .into()
            })
            .collect();

        photo_tiles.push(
            button(
                text("+")
                    .size(24)
                    .color(color!(0x15b6d6))
                    .shaping(Shaping::Advanced),
            )
            .width(96)
            .height(96)
            .style(|_theme, _status| button::Style {
                background: Some(color!(0xf5f8fa).into()),
                border: iced::Border {
                    color: color!(0x96d2f0),
                    width: 1.0,
                    radius: 16.0.into(),
                },
                ..button::Style::default()
            })
            .on_press(Message::AddPhotosPressed)
            .into(),
        );

        column![
            legend("Dados"),
            map_canvas.map(Message::Map),
            field(
                "Nome",
                text_input("", &self.draft.name)
                    .on_input(Message::NameChanged)
                    .padding(12)
                    .into(),
            ),
            field(
                &format!("Sobre (máximo de {} caracteres)", MAX_ABOUT_LEN),
                text_input("", &self.draft.about)
                    .on_input(Message::AboutChanged)
                    .padding(12)
                    .into(),
            ),
            field(
                "Fotos",
                iced_aw::Wrap::with_elements(photo_tiles)
                    .spacing(8.0)
                    .line_spacing(8.0)
                    .into(),
            ),
        ]
        .spacing(24)
        .into()
    }

    /// Second fieldset: visiting details
    fn visiting_section(&self) -> Element<Message> {
        column![
            legend("Visitação"),
            field(
                "Instruções",
                text_input("", &self.draft.instructions)
                    .on_input(Message::InstructionsChanged)
                    .padding(12)
                    .into(),
            ),
            field(
                "Horário de funcionamento",
                text_input("", &self.draft.opening_hours)
                    .on_input(Message::OpeningHoursChanged)
                    .padding(12)
                    .into(),
            ),
            field(
                "Atende fim de semana",
                row![
                    toggle_button("Sim", self.draft.open_on_weekends, true),
                    toggle_button("Não", !self.draft.open_on_weekends, false),
                ]
                .spacing(8)
                .into(),
            ),
        ]
        .spacing(24)
        .into()
    }
}

/// Section heading in the style of the form's fieldset legends
fn legend(title: &str) -> Element<'_, Message> {
    column![
        text(title.to_string())
            .size(28)
            .color(color!(0x5c8599))
            .shaping(Shaping::Advanced),
        horizontal_rule(1),
    ]
    .spacing(12)
    .into()
}

/// Label plus its input control
fn field<'a>(label: &str, input: Element<'a, Message>) -> Element<'a, Message> {
    column![
        text(label.to_string())
            .size(15)
            .color(color!(0x8fa7b3))
            .shaping(Shaping::Advanced),
        input,
    ]
    .spacing(8)
    .into()
}

/// One half of the weekend toggle; both set the same boolean
fn toggle_button(label: &str, active: bool, value: bool) -> Element<'_, Message> {
    button(
        text(label.to_string())
            .size(16)
            .shaping(Shaping::Advanced)
            .width(Length::Fill)
            .align_x(Horizontal::Center)
            .color(if active {
                color!(0x37c77f)
            } else {
                color!(0x5c8599)
            }),
    )
    .width(Length::Fill)
    .padding(14)
    .style(move |_theme, _status| button::Style {
        background: Some(if active {
            color!(0xedfff6).into()
        } else {
            color!(0xf5f8fa).into()
        }),
        border: iced::Border {
            color: if active {
                color!(0xa1e9c5)
            } else {
                color!(0xd3e2e5)
            },
            width: 1.0,
            radius: 8.0.into(),
        },
        ..button::Style::default()
    })
    .on_press(Message::OpenOnWeekendsChanged(value))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::mercator::Coordinate;

    fn screen() -> CreateOrphanage {
        let (screen, _task) = CreateOrphanage::new(
            Api::new("http://localhost:0".to_string()),
            Size::new(800.0, 600.0),
        );
        screen
    }

    #[test]
    fn test_map_click_picks_the_position() {
        let mut screen = screen();
        assert!(screen.markers.is_empty());

        let spot = Coordinate::new(-28.45, -52.20);
        screen.update(Message::Map(MapEvent::Clicked(spot)));

        assert_eq!(screen.draft.position, spot);
        assert_eq!(screen.markers.len(), 1);

        // Last click wins
        let elsewhere = Coordinate::new(-28.50, -52.25);
        screen.update(Message::Map(MapEvent::Clicked(elsewhere)));
        assert_eq!(screen.draft.position, elsewhere);
        assert_eq!(screen.markers.len(), 1);
    }

    #[test]
    fn test_field_messages_update_the_draft() {
        let mut screen = screen();
        screen.update(Message::NameChanged("Lar A".to_string()));
        screen.update(Message::AboutChanged("sobre".to_string()));
        screen.update(Message::OpenOnWeekendsChanged(false));

        assert_eq!(screen.draft.name, "Lar A");
        assert_eq!(screen.draft.about, "sobre");
        assert!(!screen.draft.open_on_weekends);
    }

    #[test]
    fn test_loaded_photos_replace_the_gallery() {
        let mut screen = screen();
        let photo = |name: &str| Photo {
            filename: name.to_string(),
            bytes: vec![1],
            preview: Handle::from_bytes(vec![1]),
        };

        screen.update(Message::PhotosLoaded(vec![photo("a.png"), photo("b.png")]));
        assert_eq!(screen.gallery.photos().len(), 2);

        screen.update(Message::PhotosLoaded(vec![photo("c.png")]));
        assert_eq!(screen.gallery.photos().len(), 1);
    }

    #[test]
    fn test_failed_submission_stays_on_the_form() {
        let mut screen = screen();
        screen.update(Message::NameChanged("Lar A".to_string()));

        match screen.update(Message::Submitted(Err("500".to_string()))) {
            Action::None => {}
            _ => panic!("a failed submission must not navigate"),
        }
        assert_eq!(screen.draft.name, "Lar A");
    }
}
