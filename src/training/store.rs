use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::stats::StatsStore;
use crate::storage::{Document, Storage, load_document, save_document};

use super::errors::{Result, TrainingError};
use super::{NewTraining, TrainingDefinition};

/// Owner of the saved training definitions.
#[derive(Debug)]
pub struct TrainingStore<S: Storage> {
    storage: S,
    definitions: Vec<TrainingDefinition>,
}

impl<S: Storage> TrainingStore<S> {
    #[instrument(level = "debug", skip(storage))]
    pub fn load(storage: S) -> Self {
        let definitions: Vec<TrainingDefinition> =
            load_document(&storage, Document::TrainingDefinitions).unwrap_or_default();
        debug!(trainings = definitions.len(), "Loaded training definitions");
        Self {
            storage,
            definitions,
        }
    }

    /// Definitions in creation order.
    pub fn list(&self) -> &[TrainingDefinition] {
        &self.definitions
    }

    pub fn get(&self, training_id: &str) -> Option<&TrainingDefinition> {
        self.definitions.iter().find(|d| d.id == training_id)
    }

    /// Validate and save a new training. Returns the stored definition.
    #[instrument(level = "debug", skip(self, clock))]
    pub fn create<C: Clock>(&mut self, new: NewTraining, clock: &C) -> Result<TrainingDefinition> {
        let definition = new.into_definition(crate::new_id(), clock.now_ms())?;
        self.definitions.push(definition.clone());
        self.persist();
        Ok(definition)
    }

    /// Remove a training along with every session record it produced.
    /// Returns the number of records removed.
    #[instrument(level = "debug", skip(self, stats))]
    pub fn delete<T: Storage>(
        &mut self,
        training_id: &str,
        stats: &mut StatsStore<T>,
    ) -> Result<usize> {
        let idx = self
            .definitions
            .iter()
            .position(|d| d.id == training_id)
            .ok_or_else(|| TrainingError::TrainingNotFound(training_id.to_string()))?;

        self.definitions.remove(idx);
        self.persist();
        Ok(stats.delete_all_for(training_id))
    }

    fn persist(&mut self) {
        save_document(
            &mut self.storage,
            Document::TrainingDefinitions,
            &self.definitions,
        );
    }
}
