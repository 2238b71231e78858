// File source resolving names under a data directory
// Author: Gabriel Demetrios Lafis

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::data::{CsvSource, DataSet, DataSource, FileFormat, JsonSource};
use super::SourceError;

/// `path` with `.{extension}` appended to its file name
fn with_suffix(path: &Path, format: FileFormat) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// File source adapter
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    /// Create a new file source rooted at `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        FileSource {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if name.is_empty() || escapes {
            return Err(SourceError::File(format!(
                "Invalid file name '{}': must be relative to the data directory",
                name
            )));
        }

        Ok(self.data_dir.join(relative))
    }

    fn read_as(path: &Path, format: FileFormat) -> Result<DataSet, SourceError> {
        let dataset = match format {
            FileFormat::Csv => CsvSource::new(path, ',').read()?,
            FileFormat::Json => JsonSource::new(path).read()?,
        };
        Ok(dataset)
    }

    /// Read the file `name` from the data directory.
    ///
    /// The suffix selects the parser. Without a recognized suffix the file is
    /// tried as JSON first and as CSV second: the bare path when it exists,
    /// otherwise `name.json` and `name.csv`.
    pub fn read(&self, name: &str) -> Result<DataSet, SourceError> {
        let path = self.resolve(name)?;

        if let Some(format) = FileFormat::from_path(&path) {
            debug!("Reading {} as {}", path.display(), format.extension());
            return Self::read_as(&path, format).map_err(|e| {
                SourceError::File(format!("Error reading file '{}': {}", name, e))
            });
        }

        let candidates = if path.is_file() {
            vec![(path.clone(), FileFormat::Json), (path, FileFormat::Csv)]
        } else {
            vec![
                (with_suffix(&path, FileFormat::Json), FileFormat::Json),
                (with_suffix(&path, FileFormat::Csv), FileFormat::Csv),
            ]
        };

        let mut failures = Vec::new();
        for (candidate, format) in candidates {
            match Self::read_as(&candidate, format) {
                Ok(dataset) => return Ok(dataset),
                Err(err) => {
                    debug!("{} as {} failed: {}", candidate.display(), format.extension(), err);
                    failures.push(format!("{}: {}", format.extension(), err));
                }
            }
        }

        Err(SourceError::File(format!(
            "Could not read '{}' as JSON or CSV ({})",
            name,
            failures.join("; ")
        )))
    }

    /// List readable files in the data directory
    pub fn list(&self) -> Result<Vec<String>, SourceError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SourceError::File(e.to_string()))?.path();
            if path.is_file() && FileFormat::from_path(&path).is_some() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
