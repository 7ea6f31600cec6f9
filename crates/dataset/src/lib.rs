//! # Legend Dataset
//!
//! Loads the player roster (a CSV with named columns) into engine candidates.
//! Position and conference normalisation happen in the engine; this crate only
//! coerces cells and drops rows that cannot be read.

mod error;
mod loader;

pub use error::{DatasetError, Result};
pub use loader::{
    default_dataset_paths, load_roster, load_roster_from_reader, locate_dataset, Roster,
    ROSTER_FILE_NAME,
};
