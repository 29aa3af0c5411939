/// Screens and shared widgets
///
/// Each page of the client is a screen struct with its own message enum
/// and update/view pair; screens hand control-flow decisions back to the
/// application through [`Action`].

pub mod create_orphanage;
pub mod orphanages_map;
pub mod sidebar;

use iced::Task;

use crate::route::Route;

/// What a screen wants the application to do after an update
pub enum Action<M> {
    /// Nothing beyond the state change
    None,
    /// Run this background task
    Run(Task<M>),
    /// Switch to another route
    Navigate(Route),
}
