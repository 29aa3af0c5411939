/// Slim sidebar of the form page
///
/// A brand-colored rail with the app symbol on top and the back
/// affordance at the bottom.

use iced::widget::text::Shaping;
use iced::widget::{button, column, container, text, vertical_space};
use iced::{color, Alignment, Element, Length};

pub fn sidebar<'a, Message: Clone + 'a>(on_back: Message) -> Element<'a, Message> {
    let back = button(
        text("←")
            .size(24)
            .shaping(Shaping::Advanced)
            .color(color!(0xffffff)),
    )
    .padding([8, 16])
    .style(|_theme, _status| button::Style {
        background: Some(color!(0x12afcb).into()),
        border: iced::Border {
            radius: 12.0.into(),
            ..iced::Border::default()
        },
        ..button::Style::default()
    })
    .on_press(on_back);

    let content = column![
        text("🗺").size(40).shaping(Shaping::Advanced),
        vertical_space(),
        back,
    ]
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .height(Length::Fill);

    container(content)
        .width(96)
        .height(Length::Fill)
        .padding(24)
        .style(|_theme| container::Style {
            background: Some(color!(0x15c3d6).into()),
            ..container::Style::default()
        })
        .into()
}
