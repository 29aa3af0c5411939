/// Client-side routes
///
/// The original frontend addressed its pages through a router; here the
/// routes are a plain enum. `path()` keeps the canonical string form used
/// for links and log lines.

/// A navigable page of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The map listing (root)
    OrphanagesMap,
    /// The registration form
    CreateOrphanage,
    /// A single record's detail page, served outside this client
    Orphanage(i64),
}

impl Route {
    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::OrphanagesMap => String::from("/"),
            Route::CreateOrphanage => String::from("/orphanages/create"),
            Route::Orphanage(id) => format!("/orphanage/{}", id),
        }
    }
}
