//! Persistence of the trained model
//!
//! The model file captures ratings, display names and pairwise records as
//! plain JSON so prediction can resume without retraining. Form state is
//! not part of the model; it is rebuilt from the collected dataset.

pub mod model;

pub use model::{load_into, load_model, save_model, ModelFile};
