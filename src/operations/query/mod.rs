mod find_path;
mod is_valid;
mod nearest_cell;

pub use find_path::{FindPath, GridPath};
pub use is_valid::IsValid;
pub use nearest_cell::NearestCell;
