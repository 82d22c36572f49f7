pub mod overlay_geometry;
pub mod preferences;
