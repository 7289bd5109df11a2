pub mod filter;
pub mod geocode;
pub mod icons;
pub mod map_view;
pub mod markers;
pub mod stats;
pub mod sync;
pub mod weather;
