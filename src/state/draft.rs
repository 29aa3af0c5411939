/// Registration draft for a new orphanage
///
/// This struct holds everything the form screen collects before
/// submission: the text fields, the weekend flag and the coordinate
/// picked on the map. One flat draft per form instance; it is dropped
/// with the screen after a successful submission.

use crate::map::mercator::Coordinate;

/// The "about" field is capped by the form, not by the backend
pub const MAX_ABOUT_LEN: usize = 300;

/// All fields of an orphanage registration
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanageDraft {
    /// Orphanage name
    pub name: String,
    /// Short description, at most [`MAX_ABOUT_LEN`] characters
    pub about: String,
    /// Visiting instructions
    pub instructions: String,
    /// Opening-hours text (free form)
    pub opening_hours: String,
    /// Whether the orphanage receives visits on weekends
    pub open_on_weekends: bool,
    /// Location picked by clicking the map; (0, 0) means "not picked yet"
    pub position: Coordinate,
}

impl Default for OrphanageDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            about: String::new(),
            instructions: String::new(),
            opening_hours: String::new(),
            // The form starts with "open on weekends" selected
            open_on_weekends: true,
            position: Coordinate::default(),
        }
    }
}

impl OrphanageDraft {
    /// Create an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: String) {
        self.name = value;
    }

    /// Set the description, truncating past [`MAX_ABOUT_LEN`] characters
    pub fn set_about(&mut self, value: String) {
        if value.chars().count() > MAX_ABOUT_LEN {
            self.about = value.chars().take(MAX_ABOUT_LEN).collect();
        } else {
            self.about = value;
        }
    }

    pub fn set_instructions(&mut self, value: String) {
        self.instructions = value;
    }

    pub fn set_opening_hours(&mut self, value: String) {
        self.opening_hours = value;
    }

    /// Single setter for the weekend flag; both toggle buttons bind here
    pub fn set_open_on_weekends(&mut self, value: bool) {
        self.open_on_weekends = value;
    }

    /// Overwrite the picked position wholesale; last click wins
    pub fn set_position(&mut self, position: Coordinate) {
        self.position = position;
    }

    /// Whether a location has been picked yet
    ///
    /// (0, 0) doubles as the "unset" sentinel, so a marker is only shown
    /// once the position moved away from the default.
    pub fn has_position(&self) -> bool {
        self.position != Coordinate::default()
    }
}
