pub mod group;
pub mod scroll;
pub mod series;
pub mod store;
pub mod vector;
pub mod viewport;
