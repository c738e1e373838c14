//! The stores of one trainer, built once at start-up.
use rand::Rng;
use tracing::{debug, instrument};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, TrainerConfig};
use crate::range::RangeStore;
use crate::stats::StatsStore;
use crate::storage::{DirectoryStorage, MemoryStorage, Storage};
use crate::training::{
    NewTraining, Result, TrainingDefinition, TrainingEngine, TrainingError, TrainingStore,
};

/// Storage handed to every store of a workspace.
pub type BoxedStorage = Box<dyn Storage>;

/// Range, training and statistics stores sharing one storage backend.
///
/// ```
/// use rand::rng;
/// use range_trainer::config::TrainerConfig;
/// use range_trainer::training::{NewTraining, TrainingProgress};
/// use range_trainer::workspace::Workspace;
///
/// let mut workspace = Workspace::open(TrainerConfig::default()).unwrap();
/// let range_id = workspace.ranges().selected_range().to_string();
/// let training = workspace
///     .create_training(NewTraining::border_repeat("Rebuild", vec![range_id]))
///     .unwrap();
///
/// let mut engine = workspace.start_training(&training.id, &mut rng()).unwrap();
/// engine.check_user_matrix().unwrap();
/// let progress = engine.advance(workspace.stats_mut()).unwrap();
///
/// assert!(matches!(progress, TrainingProgress::Completed(_)));
/// assert_eq!(1, workspace.stats().aggregate(&training.id).unwrap().session_count);
/// ```
pub struct Workspace<C: Clock + Clone = SystemClock> {
    config: TrainerConfig,
    clock: C,
    ranges: RangeStore<BoxedStorage>,
    trainings: TrainingStore<BoxedStorage>,
    stats: StatsStore<BoxedStorage>,
}

impl Workspace<SystemClock> {
    /// Validate the configuration and load every store, from
    /// `storage_dir` when set and from memory otherwise.
    #[instrument(level = "debug")]
    pub fn open(config: TrainerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let workspace = match config.storage_dir.clone() {
            Some(dir) => {
                debug!(?dir, "Opening workspace on disk");
                let storage = DirectoryStorage::new(dir);
                Self::with_storage(config, storage, SystemClock)
            }
            None => {
                debug!("Opening in-memory workspace");
                Self::with_storage(config, MemoryStorage::new(), SystemClock)
            }
        };
        Ok(workspace)
    }
}

impl<C: Clock + Clone> Workspace<C> {
    /// Load every store from clones of `storage`.
    pub fn with_storage<S>(config: TrainerConfig, storage: S, clock: C) -> Self
    where
        S: Storage + Clone + 'static,
    {
        let boxed = |s: S| -> BoxedStorage { Box::new(s) };
        Self {
            ranges: RangeStore::load(boxed(storage.clone())),
            trainings: TrainingStore::load(boxed(storage.clone())),
            stats: StatsStore::load(boxed(storage)),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn ranges(&self) -> &RangeStore<BoxedStorage> {
        &self.ranges
    }

    pub fn ranges_mut(&mut self) -> &mut RangeStore<BoxedStorage> {
        &mut self.ranges
    }

    pub fn trainings(&self) -> &TrainingStore<BoxedStorage> {
        &self.trainings
    }

    pub fn stats(&self) -> &StatsStore<BoxedStorage> {
        &self.stats
    }

    /// The statistics store, also the recorder completed sessions go to.
    pub fn stats_mut(&mut self) -> &mut StatsStore<BoxedStorage> {
        &mut self.stats
    }

    pub fn create_training(&mut self, new: NewTraining) -> Result<TrainingDefinition> {
        self.trainings.create(new, &self.clock)
    }

    /// Start a session of a saved training on the ranges as they are now.
    #[instrument(level = "debug", skip(self, rng))]
    pub fn start_training<R: Rng + ?Sized>(
        &self,
        training_id: &str,
        rng: &mut R,
    ) -> Result<TrainingEngine<C>> {
        let definition = self
            .trainings
            .get(training_id)
            .cloned()
            .ok_or_else(|| TrainingError::TrainingNotFound(training_id.to_string()))?;

        let mut engine = TrainingEngine::new(
            definition,
            &self.ranges.snapshot(),
            &self.config,
            self.clock.clone(),
        )?;
        engine.start(rng)?;
        Ok(engine)
    }

    /// Delete a training and its statistics. Returns the number of session
    /// records removed.
    pub fn delete_training(&mut self, training_id: &str) -> Result<usize> {
        self.trainings.delete(training_id, &mut self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::Hand;
    use crate::training::{ClassicSubtype, TrainingProgress};
    use rand::{SeedableRng, rngs::StdRng};

    fn workspace(storage: MemoryStorage, clock: &ManualClock) -> Workspace<ManualClock> {
        Workspace::with_storage(TrainerConfig::default(), storage, clock.clone())
    }

    #[test_log::test]
    fn test_open_validates_config() {
        let config = TrainerConfig {
            border_check_questions: 0,
            ..TrainerConfig::default()
        };
        assert!(matches!(
            Workspace::open(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test_log::test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = TrainerConfig {
            storage_dir: Some(dir.path().to_path_buf()),
            ..TrainerConfig::default()
        };

        let folder_id = {
            let mut workspace = Workspace::open(config.clone()).unwrap();
            let id = workspace.ranges_mut().create_folder();
            workspace
                .create_training(NewTraining::border_repeat("Rebuild", vec!["r".to_string()]))
                .unwrap();
            id
        };

        let workspace = Workspace::open(config).unwrap();
        assert!(workspace.ranges().find_folder(&folder_id).is_some());
        assert_eq!(1, workspace.trainings().list().len());
        assert!(dir.path().join("poker-ranges-folders.json").exists());
    }

    #[test_log::test]
    fn test_full_classic_session_is_recorded() {
        let storage = MemoryStorage::new();
        let clock = ManualClock::new(0);
        let mut workspace = workspace(storage.clone(), &clock);

        let range_id = workspace.ranges().selected_range().to_string();
        workspace
            .ranges_mut()
            .set_hand_action(&range_id, Hand::from_notation("AA").unwrap(), Some("raise"))
            .unwrap();
        let training = workspace
            .create_training(NewTraining::classic(
                "Border",
                ClassicSubtype::BorderCheck,
                vec![range_id],
            ))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let mut engine = workspace.start_training(&training.id, &mut rng).unwrap();
        let mut completed = false;
        while !completed {
            let evaluation = engine.submit_classic_answer("raise").unwrap().clone();
            clock.advance(1_000);
            let progress = match evaluation.auto_advance {
                Some(ticket) => engine
                    .fire_auto_advance(&ticket, workspace.stats_mut())
                    .unwrap()
                    .unwrap(),
                None => engine.advance(workspace.stats_mut()).unwrap(),
            };
            completed = matches!(progress, TrainingProgress::Completed(_));
        }

        // Only AA raises among the nine border hands.
        let aggregate = workspace.stats().aggregate(&training.id).unwrap();
        assert_eq!(1, aggregate.session_count);
        assert_eq!(9, aggregate.total_questions);
        assert_eq!(1, aggregate.total_correct);

        let reloaded = StatsStore::load(storage);
        assert_eq!(1, reloaded.list_for(&training.id).len());
    }

    #[test_log::test]
    fn test_start_unknown_or_empty_training() {
        let clock = ManualClock::new(0);
        let mut workspace = workspace(MemoryStorage::new(), &clock);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            Some(TrainingError::TrainingNotFound("nope".to_string())),
            workspace.start_training("nope", &mut rng).err()
        );

        let training = workspace
            .create_training(NewTraining::border_repeat("Ghost", vec!["deleted".to_string()]))
            .unwrap();
        assert_eq!(
            Some(TrainingError::EmptySession),
            workspace.start_training(&training.id, &mut rng).err()
        );
    }

    #[test_log::test]
    fn test_delete_training_cascades() {
        let clock = ManualClock::new(0);
        let mut workspace = workspace(MemoryStorage::new(), &clock);
        let range_id = workspace.ranges().selected_range().to_string();
        let training = workspace
            .create_training(NewTraining::border_repeat("Rebuild", vec![range_id]))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..2 {
            let mut engine = workspace.start_training(&training.id, &mut rng).unwrap();
            engine.check_user_matrix().unwrap();
            engine.advance(workspace.stats_mut()).unwrap();
        }
        assert_eq!(2, workspace.stats().list_for(&training.id).len());

        assert_eq!(Ok(2), workspace.delete_training(&training.id));
        assert!(workspace.trainings().get(&training.id).is_none());
        assert!(workspace.stats().aggregate(&training.id).is_none());
    }
}
