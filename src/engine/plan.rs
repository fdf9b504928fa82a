//! Plan files: a scan's proposals written to JSON so they can be reviewed,
//! trimmed by hand, and applied later. Whatever is left in the file is the
//! approved set.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::{RenamerError, Result};

use super::report::{RenameProposal, ScanReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub directory: PathBuf,
    pub renames: Vec<RenameProposal>,
}

impl From<&ScanReport> for RenamePlan {
    fn from(report: &ScanReport) -> Self {
        Self {
            directory: report.directory.clone(),
            renames: report.proposals.clone(),
        }
    }
}

impl RenamePlan {
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(RenamerError::io(parent))?;
        }
        let file = File::create(path).map_err(RenamerError::io(path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(RenamerError::io(path))?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(RenamerError::io(path))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn hand_trimmed_plan_reads_back() {
        let td = tempdir().unwrap();
        let path = td.path().join("plan.json");
        let json = r#"{
            "directory": "/music",
            "renames": [ { "original": "a_b.mp3", "proposed": "a b.mp3" } ]
        }"#;
        fs::write(&path, json).unwrap();
        let plan = RenamePlan::read(&path).unwrap();
        assert_eq!(plan.directory, PathBuf::from("/music"));
        assert_eq!(plan.renames, vec![RenameProposal::new("a_b.mp3", "a b.mp3")]);
    }

    #[test]
    fn write_then_read_is_identity() {
        let td = tempdir().unwrap();
        let path = td.path().join("out").join("plan.json");
        let plan = RenamePlan {
            directory: td.path().to_path_buf(),
            renames: vec![RenameProposal::new("x_1.mp3", "x 1.mp3")],
        };
        plan.write(&path).unwrap();
        assert_eq!(RenamePlan::read(&path).unwrap(), plan);
    }
}
