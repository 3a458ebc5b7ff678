//! Playlist of one folder: listing, the `Track` model, and circular
//! navigation over it.

mod controller;
mod model;
mod scan;

pub use controller::PlaylistController;
pub use model::Track;

#[cfg(test)]
mod tests;
