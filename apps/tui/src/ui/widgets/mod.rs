pub mod markdown;
pub mod popup;
pub mod status;
pub mod tables;
pub mod tour_map;
