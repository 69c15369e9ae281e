pub mod legend;
pub mod palette;
pub mod popup;
pub mod tables;
pub mod world_map;
