use std::{fs::File, io, path::Path};

use crate::{
    error::{Error, Result},
    runner::EpisodeReport,
};

/// Writes [episode reports](EpisodeReport) as CSV rows
///
/// Columns: `run, episode, steps, truncated`, then `reward_<i>` and `epsilon_<i>` for each
/// agent `i`.
pub struct ReportWriter<W: io::Write> {
    wtr: csv::Writer<W>,
    n_agents: usize,
}

impl ReportWriter<File> {
    pub fn from_path(path: impl AsRef<Path>, n_agents: usize) -> Result<Self> {
        Self::new(csv::Writer::from_path(path)?, n_agents)
    }
}

impl<W: io::Write> ReportWriter<W> {
    /// Wrap `wtr` and write the header row
    pub fn new(mut wtr: csv::Writer<W>, n_agents: usize) -> Result<Self> {
        let mut header = vec![
            "run".to_string(),
            "episode".to_string(),
            "steps".to_string(),
            "truncated".to_string(),
        ];
        header.extend((0..n_agents).map(|i| format!("reward_{i}")));
        header.extend((0..n_agents).map(|i| format!("epsilon_{i}")));
        wtr.write_record(&header)?;
        Ok(Self { wtr, n_agents })
    }

    pub fn write(&mut self, run: u32, report: &EpisodeReport) -> Result<()> {
        debug_assert_eq!(report.rewards.len(), self.n_agents);
        let mut record = vec![
            run.to_string(),
            report.episode.to_string(),
            report.steps.to_string(),
            report.truncated.to_string(),
        ];
        record.extend(report.rewards.iter().map(f64::to_string));
        record.extend(report.epsilons.iter().map(f64::to_string));
        self.wtr.write_record(&record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
