/// State management module
///
/// This module holds the form screen's working data:
/// - The registration draft being filled in (draft.rs)
/// - The photo selection and its previews (gallery.rs)

pub mod draft;
pub mod gallery;
