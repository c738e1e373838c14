use tracing::{debug, instrument};

use crate::storage::{Document, Storage, load_document, save_document};

use super::{SessionRecord, accuracy, format_duration};

/// Receives the record of each completed session.
pub trait SessionRecorder {
    fn record(&mut self, record: SessionRecord);
}

impl SessionRecorder for Vec<SessionRecord> {
    fn record(&mut self, record: SessionRecord) {
        self.push(record);
    }
}

impl<R: SessionRecorder + ?Sized> SessionRecorder for &mut R {
    fn record(&mut self, record: SessionRecord) {
        (**self).record(record);
    }
}

/// Totals over every session of one training.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingAggregate {
    pub session_count: usize,
    pub total_questions: usize,
    pub total_correct: usize,
    /// `total_correct / total_questions` as a percentage, one decimal.
    pub average_accuracy: f64,
    pub average_duration_ms: u64,
    /// `average_duration_ms` as `m:ss`.
    pub average_duration_formatted: String,
}

/// Owner of all session records, kept as one flat list.
#[derive(Debug)]
pub struct StatsStore<S: Storage> {
    storage: S,
    records: Vec<SessionRecord>,
}

impl<S: Storage> StatsStore<S> {
    #[instrument(level = "debug", skip(storage))]
    pub fn load(storage: S) -> Self {
        let records: Vec<SessionRecord> =
            load_document(&storage, Document::TrainingStatistics).unwrap_or_default();
        debug!(records = records.len(), "Loaded session records");
        Self { storage, records }
    }

    /// All records in the order they were written.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn append(&mut self, record: SessionRecord) {
        debug!(
            training_id = %record.training_id,
            accuracy = record.accuracy,
            "Appending session record"
        );
        self.records.push(record);
        self.persist();
    }

    /// Records of one training, newest first.
    pub fn list_for(&self, training_id: &str) -> Vec<&SessionRecord> {
        let mut records: Vec<&SessionRecord> = self
            .records
            .iter()
            .rev()
            .filter(|r| r.training_id == training_id)
            .collect();
        // Stable, so equal timestamps keep the later write first.
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        records
    }

    /// Remove every record of a training. Returns how many were removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_all_for(&mut self, training_id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.training_id != training_id);
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Totals for one training, `None` when it has no sessions yet.
    pub fn aggregate(&self, training_id: &str) -> Option<TrainingAggregate> {
        let records: Vec<&SessionRecord> = self
            .records
            .iter()
            .filter(|r| r.training_id == training_id)
            .collect();
        if records.is_empty() {
            return None;
        }

        let session_count = records.len();
        let total_questions = records.iter().map(|r| r.total_questions).sum();
        let total_correct = records.iter().map(|r| r.correct_answers).sum();
        let total_duration: u64 = records.iter().map(|r| r.duration).sum();
        let average_duration_ms = total_duration / session_count as u64;

        Some(TrainingAggregate {
            session_count,
            total_questions,
            total_correct,
            average_accuracy: accuracy(total_correct, total_questions),
            average_duration_ms,
            average_duration_formatted: format_duration(average_duration_ms),
        })
    }

    fn persist(&mut self) {
        save_document(
            &mut self.storage,
            Document::TrainingStatistics,
            &self.records,
        );
    }
}

impl<S: Storage> SessionRecorder for StatsStore<S> {
    fn record(&mut self, record: SessionRecord) {
        self.append(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FailingStorage, MemoryStorage};
    use crate::training::TrainingMode;
    use approx::assert_relative_eq;

    fn record(training_id: &str, completed_at: u64, correct: usize, total: usize) -> SessionRecord {
        SessionRecord {
            id: crate::new_id(),
            training_id: training_id.to_string(),
            training_name: training_id.to_uppercase(),
            mode: TrainingMode::Classic,
            completed_at,
            duration: 30_000,
            accuracy: accuracy(correct, total),
            total_questions: total,
            correct_answers: correct,
            details: vec![],
        }
    }

    #[test_log::test]
    fn test_list_for_newest_first() {
        let mut stats = StatsStore::load(MemoryStorage::new());
        stats.append(record("a", 100, 1, 1));
        stats.append(record("b", 150, 1, 1));
        stats.append(record("a", 300, 1, 1));
        stats.append(record("a", 200, 1, 1));

        let times: Vec<u64> = stats.list_for("a").iter().map(|r| r.completed_at).collect();
        assert_eq!(vec![300, 200, 100], times);
        assert!(stats.list_for("missing").is_empty());
    }

    #[test]
    fn test_aggregate_without_sessions() {
        let stats = StatsStore::load(MemoryStorage::new());
        assert_eq!(None, stats.aggregate("a"));
    }

    #[test]
    fn test_aggregate_weights_by_questions() {
        let mut stats = StatsStore::load(MemoryStorage::new());
        let mut first = record("a", 1, 9, 10);
        first.duration = 60_000;
        let mut second = record("a", 2, 1, 20);
        second.duration = 125_000;
        stats.append(first);
        stats.append(second);
        stats.append(record("b", 3, 0, 5));

        let aggregate = stats.aggregate("a").unwrap();
        assert_eq!(2, aggregate.session_count);
        assert_eq!(30, aggregate.total_questions);
        assert_eq!(10, aggregate.total_correct);
        assert_relative_eq!(33.3, aggregate.average_accuracy);
        assert_eq!(92_500, aggregate.average_duration_ms);
        assert_eq!("1:32", aggregate.average_duration_formatted);
    }

    #[test]
    fn test_aggregate_with_zero_questions() {
        let mut stats = StatsStore::load(MemoryStorage::new());
        stats.append(record("a", 1, 0, 0));

        let aggregate = stats.aggregate("a").unwrap();
        assert_eq!(1, aggregate.session_count);
        assert_relative_eq!(0.0, aggregate.average_accuracy);
    }

    #[test_log::test]
    fn test_delete_all_for() {
        let storage = MemoryStorage::new();
        let mut stats = StatsStore::load(storage.clone());
        stats.append(record("a", 1, 1, 1));
        stats.append(record("b", 2, 1, 1));
        stats.append(record("a", 3, 1, 1));

        assert_eq!(2, stats.delete_all_for("a"));
        assert_eq!(0, stats.delete_all_for("a"));

        let reloaded = StatsStore::load(storage);
        assert_eq!(1, reloaded.records().len());
        assert_eq!("b", reloaded.records()[0].training_id);
    }

    #[test_log::test]
    fn test_recorder_appends() {
        let mut stats = StatsStore::load(FailingStorage);
        let recorder: &mut dyn SessionRecorder = &mut stats;
        recorder.record(record("a", 1, 1, 2));
        assert_eq!(1, stats.records().len());
    }

    #[test_log::test]
    fn test_load_iso_dated_records() {
        let mut storage = MemoryStorage::new();
        storage
            .save(
                Document::TrainingStatistics,
                r#"[{"id":"s1","trainingId":"t","trainingName":"T","type":"classic",
                    "completedAt":"2024-03-01T18:30:00.000Z","duration":61000,
                    "accuracy":66.7,"totalQuestions":3,"correctAnswers":2,"details":[]},
                   {"id":"s2","trainingId":"t","trainingName":"T","type":"classic",
                    "completedAt":1709400000000,"duration":1000,
                    "accuracy":100,"totalQuestions":1,"correctAnswers":1}]"#,
            )
            .unwrap();

        let stats = StatsStore::load(storage);
        let listed: Vec<&str> = stats.list_for("t").iter().map(|r| r.id.as_str()).collect();
        assert_eq!(vec!["s2", "s1"], listed);
        assert_eq!(1_709_317_800_000, stats.records()[0].completed_at);
    }
}
