// Domain layer - Pure chart geometry, section model and layout state
pub mod charts;
pub mod geometry;
pub mod layout;
pub mod section;
pub mod series;
pub mod theme;
