use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};

/// Which files of the input directory take part in the benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFilter {
    /// Every regular file.
    Any,
    /// Files whose extension equals the given one (without the dot).
    Extension(String),
}

impl FileFilter {
    /// `"*"` selects every file; anything else is an extension, leading dot optional.
    pub fn parse(pattern: &str) -> Self {
        match pattern.trim() {
            "*" | "" => FileFilter::Any,
            ext => FileFilter::Extension(ext.trim_start_matches('.').to_string()),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            FileFilter::Any => true,
            FileFilter::Extension(wanted) => path
                .extension()
                .map(|ext| ext == wanted.as_str())
                .unwrap_or(false),
        }
    }
}

/// Immutable in-memory corpus: file name to content, ordered by name.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    files: BTreeMap<String, Vec<u8>>,
    total_original_size: u64,
}

impl Dataset {
    /// Loads every matching regular file of `dir` (non-recursive).
    pub fn load<P: AsRef<Path>>(dir: P, filter: &FileFilter) -> Result<Self> {
        let paths = list_input_files(dir.as_ref(), filter)?;

        let mut dataset = Dataset::default();
        for path in paths {
            let data = fs::read(&path).map_err(|e| BenchError::setup(&path, e))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| BenchError::setup(&path, "path has no file name"))?;
            debug!("loaded {} ({} bytes)", name, data.len());
            dataset.insert(name, data);
        }

        info!(
            "loaded {} files, {} bytes total, from {}",
            dataset.len(),
            dataset.total_original_size,
            dir.as_ref().display()
        );
        Ok(dataset)
    }

    /// Builds a dataset from in-memory entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut dataset = Dataset::default();
        for (name, data) in entries {
            dataset.insert(name.into(), data);
        }
        dataset
    }

    fn insert(&mut self, name: String, data: Vec<u8>) {
        self.total_original_size += data.len() as u64;
        if let Some(previous) = self.files.insert(name, data) {
            self.total_original_size -= previous.len() as u64;
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of the byte lengths of all files.
    pub fn total_original_size(&self) -> u64 {
        self.total_original_size
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files
            .iter()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }
}

/// Lists the files `Dataset::load` would read, sorted by path.
pub fn list_input_files(dir: &Path, filter: &FileFilter) -> Result<Vec<std::path::PathBuf>> {
    if dir.as_os_str().is_empty() {
        return Err(BenchError::setup(dir, "input directory is not specified"));
    }
    if !dir.is_dir() {
        return Err(BenchError::setup(dir, "input directory does not exist or is not a directory"));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BenchError::setup(dir, e))? {
        let path = entry.map_err(|e| BenchError::setup(dir, e))?.path();

        // Check if the path is a file with the wanted extension
        if path.is_file() && filter.matches(&path) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        let reason = match filter {
            FileFilter::Any => "no files found in the input directory".to_string(),
            FileFilter::Extension(ext) => format!("no .{} files found in the input directory", ext),
        };
        return Err(BenchError::setup(dir, reason));
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_filters_by_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.json"), b"{\"b\": 2}").unwrap();
        fs::write(dir.path().join("a.json"), b"{\"a\": 1}").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let dataset = Dataset::load(dir.path(), &FileFilter::parse("json")).unwrap();
        let names: Vec<&str> = dataset.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert_eq!(dataset.total_original_size(), 16);
        assert_eq!(dataset.get("a.json"), Some(&b"{\"a\": 1}"[..]));
    }

    #[test]
    fn test_wildcard_takes_every_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), b"1").unwrap();
        fs::write(dir.path().join("README"), b"22").unwrap();

        let dataset = Dataset::load(dir.path(), &FileFilter::parse("*")).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.total_original_size(), 3);
    }

    #[test]
    fn test_missing_directory_is_setup_error() {
        let dir = tempdir().unwrap();
        let err = Dataset::load(dir.path().join("absent"), &FileFilter::Any).unwrap_err();
        assert!(err.is_setup());

        let err = Dataset::load("", &FileFilter::Any).unwrap_err();
        assert!(err.is_setup());
    }

    #[test]
    fn test_no_matching_files_is_setup_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), b"a,b").unwrap();

        let err = Dataset::load(dir.path(), &FileFilter::parse(".json")).unwrap_err();
        assert!(err.is_setup());
        assert!(err.to_string().contains("no .json files"));
    }

    #[test]
    fn test_from_entries_replaces_duplicates() {
        let dataset = Dataset::from_entries([("a", vec![0u8; 10]), ("a", vec![0u8; 4])]);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.total_original_size(), 4);
    }
}
