//! Domain entities

mod player_profile;
mod warp;

pub use player_profile::PlayerProfile;
pub use warp::Warp;
