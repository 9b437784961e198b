pub mod body;
pub mod collision;
pub mod error;
pub mod params;
pub mod physics;
pub mod scene;
pub mod time;
