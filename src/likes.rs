//! Liked models: a plain set of names using exact string equality, not the
//! case-insensitive key the history uses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikedModels {
    models: Vec<String>,
}

impl LikedModels {
    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn is_liked(&self, model_name: &str) -> bool {
        self.models.iter().any(|model| model == model_name)
    }

    /// Flips the liked state and returns the new one.
    pub fn toggle(&mut self, model_name: &str) -> bool {
        if let Some(index) = self.models.iter().position(|model| model == model_name) {
            self.models.remove(index);
            false
        } else {
            self.models.push(model_name.to_string());
            true
        }
    }
}
