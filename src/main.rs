use iced::{Element, Size, Task, Theme};
use tracing_subscriber::EnvFilter;

mod api;
mod map;
mod route;
mod state;
mod ui;

use api::Api;
use route::Route;
use ui::create_orphanage::{self, CreateOrphanage};
use ui::orphanages_map::{self, OrphanagesMap};
use ui::Action;

/// Default window size; also the tile-prefetch viewport before the
/// first interaction reports real bounds
fn window_size() -> Size {
    Size::new(1100.0, 700.0)
}

/// Main application state
struct Happy {
    api: Api,
    screen: Screen,
}

/// The page currently on screen
enum Screen {
    OrphanagesMap(OrphanagesMap),
    CreateOrphanage(CreateOrphanage),
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    OrphanagesMap(orphanages_map::Message),
    CreateOrphanage(create_orphanage::Message),
}

impl Happy {
    /// Create a new instance of the application, opening on the listing
    fn new() -> (Self, Task<Message>) {
        let api = Api::from_env();
        let (screen, task) = OrphanagesMap::new(api.clone(), window_size());

        (
            Happy {
                api,
                screen: Screen::OrphanagesMap(screen),
            },
            task.map(Message::OrphanagesMap),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OrphanagesMap(message) => {
                let Screen::OrphanagesMap(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::OrphanagesMap),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
            Message::CreateOrphanage(message) => {
                let Screen::CreateOrphanage(screen) = &mut self.screen else {
                    return Task::none();
                };
                match screen.update(message) {
                    Action::None => Task::none(),
                    Action::Run(task) => task.map(Message::CreateOrphanage),
                    Action::Navigate(route) => self.navigate(route),
                }
            }
        }
    }

    /// Switch to a route, mounting a fresh screen for it
    fn navigate(&mut self, route: Route) -> Task<Message> {
        tracing::info!(path = %route.path(), "navigating");

        match route {
            Route::OrphanagesMap => {
                let (screen, task) = OrphanagesMap::new(self.api.clone(), window_size());
                self.screen = Screen::OrphanagesMap(screen);
                task.map(Message::OrphanagesMap)
            }
            Route::CreateOrphanage => {
                let (screen, task) = CreateOrphanage::new(self.api.clone(), window_size());
                self.screen = Screen::CreateOrphanage(screen);
                task.map(Message::CreateOrphanage)
            }
            Route::Orphanage(_) => {
                // The detail page is served elsewhere; nothing to mount
                tracing::warn!(path = %route.path(), "route has no native screen");
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match &self.screen {
            Screen::OrphanagesMap(screen) => screen.view().map(Message::OrphanagesMap),
            Screen::CreateOrphanage(screen) => screen.view().map(Message::CreateOrphanage),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::application("Happy", Happy::update, Happy::view)
        .theme(Happy::theme)
        .window_size(window_size())
        .centered()
        .run_with(Happy::new)
}
