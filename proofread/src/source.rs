//! Record source: numbers decoded rows, samples them and hands them off.

use std::error::Error;
use std::sync::mpsc::SyncSender;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::diagnostic::DiagnosticSink;
use crate::error::{ConfigError, PipelineError};
use crate::record::{FIRST_RECORD_SEQUENCE, Record};

/// Per-record forwarding decision with probability `percentage / 100`.
#[derive(Debug, Clone)]
pub struct Sampler {
    percentage: u8,
    seed: u64,
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler. Without a seed one is drawn from entropy; either way
    /// [`Sampler::seed`] reports the seed that reproduces the run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSamplePercentage`] above 100.
    pub fn new(percentage: u8, seed: Option<u64>) -> Result<Self, ConfigError> {
        if percentage > 100 {
            return Err(ConfigError::InvalidSamplePercentage(percentage));
        }
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Self {
            percentage,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Sampler that forwards every record.
    #[must_use]
    pub fn all() -> Self {
        Self {
            percentage: 100,
            seed: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Configured forwarding percentage.
    #[must_use]
    pub const fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Seed that reproduces this sampler's decisions.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Decide whether the next record enters the pipeline.
    pub fn forward(&mut self) -> bool {
        match self.percentage {
            0 => false,
            100.. => true,
            p => self.rng.gen_range(0..100) < p,
        }
    }
}

/// Counts kept by the source while reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Records read from the input, header excluded.
    pub records_read: u64,
    /// Leading records passed over without validation.
    pub records_skipped: u64,
    /// Records handed to the engine.
    pub records_forwarded: u64,
}

/// Producer side of the pipeline.
///
/// Sequence numbers start at [`FIRST_RECORD_SEQUENCE`] and advance once per
/// record read, before the skip and sampling decisions.
pub struct RecordSource<I> {
    records: I,
    sampler: Sampler,
    progress_interval: u64,
    skip: u64,
}

impl<I, E> RecordSource<I>
where
    I: Iterator<Item = Result<Vec<String>, E>>,
    E: Error + Send + Sync + 'static,
{
    /// `progress_interval` counts records read; 0 disables progress messages.
    #[must_use]
    pub fn new(records: I, sampler: Sampler, progress_interval: u64) -> Self {
        Self {
            records,
            sampler,
            progress_interval,
            skip: 0,
        }
    }

    /// Pass over the first `rows` records after the header. They are still
    /// read and numbered, so later records keep their file positions.
    #[must_use]
    pub fn skip_first(mut self, rows: u64) -> Self {
        self.skip = rows;
        self
    }

    /// Seed of the sampler deciding which records are forwarded.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.sampler.seed()
    }

    /// Read every record and hand the sampled ones to `handoff`.
    ///
    /// Blocks on each hand-off until the engine takes the record. The
    /// handoff is closed when this returns, successfully or not.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Stream`] when the input fails mid-stream and
    /// [`PipelineError::EngineStopped`] when the receiving side has gone away.
    pub fn forward(
        self,
        handoff: SyncSender<Record>,
        sink: &dyn DiagnosticSink,
    ) -> Result<SourceStats, PipelineError> {
        let Self {
            records,
            mut sampler,
            progress_interval,
            skip,
        } = self;

        let mut stats = SourceStats::default();
        let mut sequence = FIRST_RECORD_SEQUENCE;
        for result in records {
            let fields = result.map_err(|err| PipelineError::Stream {
                sequence,
                source: Box::new(err),
            })?;
            stats.records_read += 1;
            if progress_interval > 0 && stats.records_read % progress_interval == 0 {
                sink.progress(stats.records_read);
            }

            if stats.records_read <= skip {
                stats.records_skipped += 1;
            } else if sampler.forward() {
                handoff
                    .send(Record::new(fields, sequence))
                    .map_err(|_| PipelineError::EngineStopped)?;
                stats.records_forwarded += 1;
            }
            sequence += 1;
        }

        drop(handoff);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::diagnostic::CollectingSink;

    fn rows(n: usize) -> Vec<Result<Vec<String>, io::Error>> {
        (0..n).map(|i| Ok(vec![i.to_string()])).collect()
    }

    /// Run the source against a collecting consumer thread.
    fn collect(
        input: Vec<Result<Vec<String>, io::Error>>,
        sampler: Sampler,
        interval: u64,
        sink: &CollectingSink,
    ) -> (Result<SourceStats, PipelineError>, Vec<Record>) {
        let (tx, rx) = mpsc::sync_channel(0);
        let consumer = thread::spawn(move || rx.into_iter().collect::<Vec<Record>>());
        let result = RecordSource::new(input.into_iter(), sampler, interval).forward(tx, sink);
        (result, consumer.join().unwrap())
    }

    #[test]
    fn test_sequence_starts_after_header() {
        let sink = CollectingSink::new();
        let (result, records) = collect(rows(3), Sampler::all(), 0, &sink);
        let stats = result.unwrap();
        assert_eq!(stats.records_read, 3);
        assert_eq!(stats.records_forwarded, 3);
        let seqs: Vec<u64> = records.iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![2, 3, 4]);
        assert_eq!(records[0].fields, vec!["0".to_owned()]);
    }

    #[test]
    fn test_zero_percent_forwards_nothing() {
        let sink = CollectingSink::new();
        let sampler = Sampler::new(0, Some(7)).unwrap();
        let (result, records) = collect(rows(50), sampler, 0, &sink);
        let stats = result.unwrap();
        assert_eq!(stats.records_read, 50);
        assert_eq!(stats.records_forwarded, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn test_sampling_keeps_file_positions() {
        let sink = CollectingSink::new();
        let sampler = Sampler::new(30, Some(1234)).unwrap();
        let (result, records) = collect(rows(200), sampler, 0, &sink);
        let stats = result.unwrap();
        assert!(stats.records_forwarded < 200);
        assert_eq!(stats.records_forwarded, records.len() as u64);

        for record in &records {
            // field i sits at file row i + 2
            let index: u64 = record.fields[0].parse().unwrap();
            assert_eq!(record.sequence, index + FIRST_RECORD_SEQUENCE);
        }
        assert!(records.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let pick = |seed| {
            let mut sampler = Sampler::new(50, Some(seed)).unwrap();
            (0..64).map(|_| sampler.forward()).collect::<Vec<bool>>()
        };
        assert_eq!(pick(99), pick(99));
        assert_eq!(Sampler::new(50, Some(99)).unwrap().seed(), 99);
    }

    #[test]
    fn test_percentage_above_hundred_is_rejected() {
        assert!(matches!(
            Sampler::new(101, None),
            Err(ConfigError::InvalidSamplePercentage(101))
        ));
    }

    #[test]
    fn test_progress_counts_records_read_not_forwarded() {
        let sink = CollectingSink::new();
        let sampler = Sampler::new(0, Some(1)).unwrap();
        let (result, _) = collect(rows(10), sampler, 4, &sink);
        result.unwrap();
        assert_eq!(sink.progress_marks(), vec![4, 8]);
    }

    #[test]
    fn test_read_failure_is_fatal_and_closes_handoff() {
        let sink = CollectingSink::new();
        let mut input = rows(2);
        input.push(Err(io::Error::other("corrupt deflate stream")));
        input.extend(rows(5));

        let (result, records) = collect(input, Sampler::all(), 0, &sink);
        match result {
            Err(PipelineError::Stream { sequence, .. }) => assert_eq!(sequence, 4),
            other => panic!("expected stream error, got {other:?}"),
        }
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_skipped_rows_keep_later_positions() {
        let sink = CollectingSink::new();
        let (tx, rx) = mpsc::sync_channel(0);
        let consumer = thread::spawn(move || rx.into_iter().collect::<Vec<Record>>());
        let stats = RecordSource::new(rows(6).into_iter(), Sampler::all(), 2)
            .skip_first(4)
            .forward(tx, &sink)
            .unwrap();
        let records = consumer.join().unwrap();

        assert_eq!(stats.records_read, 6);
        assert_eq!(stats.records_skipped, 4);
        assert_eq!(stats.records_forwarded, 2);
        let seqs: Vec<u64> = records.iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![6, 7]);
        assert_eq!(records[0].fields, vec!["4".to_owned()]);
        assert_eq!(sink.progress_marks(), vec![2, 4, 6]);
    }

    #[test]
    fn test_skip_past_end_forwards_nothing() {
        let sink = CollectingSink::new();
        let (tx, rx) = mpsc::sync_channel(0);
        let consumer = thread::spawn(move || rx.into_iter().count());
        let stats = RecordSource::new(rows(3).into_iter(), Sampler::all(), 0)
            .skip_first(10)
            .forward(tx, &sink)
            .unwrap();

        assert_eq!(consumer.join().unwrap(), 0);
        assert_eq!(stats.records_skipped, 3);
        assert_eq!(stats.records_forwarded, 0);
    }

    #[test]
    fn test_dropped_receiver_stops_source() {
        let sink = CollectingSink::new();
        let (tx, rx) = mpsc::sync_channel::<Record>(0);
        drop(rx);
        let result = RecordSource::new(rows(3).into_iter(), Sampler::all(), 0).forward(tx, &sink);
        assert!(matches!(result, Err(PipelineError::EngineStopped)));
    }
}
