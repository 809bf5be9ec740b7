//! Biography command and query handlers.

mod get_biography;
mod get_public_biography;
mod set_visibility;
mod update_biography;
mod update_timeline;

pub use get_biography::{GetBiographyHandler, GetBiographyQuery};
pub use get_public_biography::{GetPublicBiographyHandler, GetPublicBiographyQuery};
pub use set_visibility::{SetVisibilityCommand, SetVisibilityHandler};
pub use update_biography::{UpdateBiographyCommand, UpdateBiographyHandler};
pub use update_timeline::{UpdateTimelineCommand, UpdateTimelineHandler};
