//! Per-replicate output files.
//!
//! Each replicate owns a private recorder writing two files into the output
//! directory: `rNNN.tsv` with one line per live genotype on the record
//! cadence (`generation<TAB>count<TAB>colon-joined loci`), and `rNNN.R`, a
//! final snapshot shaped as an R data.frame literal with the counts and
//! genotype strings in parallel vectors.

use crate::errors::OutputError;
use crate::simulation::RunConfig;
use crate::store::GenotypeStore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer for one replicate's output files.
#[derive(Debug)]
pub struct GenerationRecorder {
    tsv: BufWriter<File>,
    snapshot_path: PathBuf,
}

impl GenerationRecorder {
    /// Open the tabular output file for a replicate (1-based numbering).
    pub fn create(dir: &Path, replicate: u32) -> Result<Self, OutputError> {
        let tsv_path = dir.join(format!("r{replicate:03}.tsv"));
        let file = File::create(&tsv_path)
            .map_err(|e| OutputError::Create(tsv_path.display().to_string(), e))?;
        Ok(Self {
            tsv: BufWriter::new(file),
            snapshot_path: dir.join(format!("r{replicate:03}.R")),
        })
    }

    /// Append one line per live genotype for the given generation.
    pub fn write_generation(
        &mut self,
        store: &GenotypeStore,
        generation: u32,
    ) -> Result<(), OutputError> {
        for genotype in store.records() {
            writeln!(
                self.tsv,
                "{generation}\t{}\t{}",
                genotype.count(),
                genotype.label()
            )?;
        }
        Ok(())
    }

    /// Write the final snapshot: an R `structure(list(...))` literal with the
    /// abundances and genotype strings as parallel vectors and the genotype
    /// count as the row count.
    pub fn write_snapshot(&self, store: &GenotypeStore) -> Result<(), OutputError> {
        let file = File::create(&self.snapshot_path)
            .map_err(|e| OutputError::Create(self.snapshot_path.display().to_string(), e))?;
        let mut out = BufWriter::new(file);

        write!(out, "structure(list(n=c(")?;
        for (i, genotype) in store.records().iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "{}", genotype.count())?;
        }
        write!(out, "), genotype=c(")?;
        for (i, genotype) in store.records().iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "\"{}\"", genotype.label())?;
        }
        write!(
            out,
            ")), row.names=c(NA, {}), class=\"data.frame\")",
            store.len()
        )?;
        out.flush()?;
        Ok(())
    }

    /// Flush buffered tabular output to disk.
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.tsv.flush()?;
        Ok(())
    }
}

/// Store the effective configuration next to the results.
pub fn write_config_json(dir: &Path, config: &RunConfig) -> Result<(), OutputError> {
    let path = dir.join("config.json");
    let file =
        File::create(&path).map_err(|e| OutputError::Create(path.display().to_string(), e))?;
    let mut out = BufWriter::new(file);
    let json = serde_json::to_string_pretty(config).expect("RunConfig serializes to JSON");
    out.write_all(json.as_bytes())?;
    out.flush()?;
    Ok(())
}
