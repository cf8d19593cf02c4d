use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use crate::audio::format::is_recognized_audio;
use crate::{ConvertError, Result};

/// A candidate audio file. Two entries are the same file when their path
/// strings are identical; no canonicalization happens here.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InputFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }

    /// File name without its final extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The files queued for the next batch, iterated in path order.
#[derive(Debug, Default, Clone)]
pub struct FileSet {
    files: BTreeSet<InputFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds explicitly selected paths without checking that they are audio.
    /// Returns how many were not already present.
    pub fn add_files<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .map(|p| self.files.insert(InputFile::new(p)))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Recursively adds every recognized audio file under `root`.
    /// Returns how many were not already present.
    pub fn add_folder(&mut self, root: impl AsRef<Path>) -> Result<usize> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConvertError::InputDirectoryMissing(root.to_path_buf()));
        }

        let found = collect_audio_files(root);
        log::debug!("Found {} audio files under {}", found.len(), root.display());
        Ok(self.add_files(found))
    }

    pub fn remove(&mut self, file: &InputFile) -> bool {
        self.files.remove(file)
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputFile> {
        self.files.iter()
    }

    pub fn to_vec(&self) -> Vec<InputFile> {
        self.files.iter().cloned().collect()
    }
}

fn collect_audio_files(dir_path: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Error accessing entry: {}", err);
                None
            }
        })
        .filter(|e| {
            let is_file = e.file_type().is_file();
            let is_audio = is_recognized_audio(e.path());
            if is_file && !is_audio {
                log::debug!("Skipping non-audio file: {}", e.path().display());
            }
            is_file && is_audio
        })
        .map(|e| e.into_path())
        .collect()
}

/// Lists the regular files directly inside `dir` whose name ends with
/// `.<extension>` (case-insensitive), sorted by path.
pub fn scan_directory(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ConvertError::InputDirectoryMissing(dir.to_path_buf()));
    }

    let listing_failed = |source| ConvertError::InputListingFailed {
        path: dir.to_path_buf(),
        source,
    };
    let suffix = format!(".{}", extension.to_lowercase());

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(listing_failed)? {
        let entry = entry.map_err(listing_failed)?;
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&suffix) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();
        path
    }

    fn names(set: &FileSet) -> Vec<String> {
        set.iter().map(|f| f.file_name.clone()).collect()
    }

    #[test]
    fn duplicate_selection_collapses() {
        let mut set = FileSet::new();
        assert_eq!(set.add_files(["/a/one.mp3", "/a/two.wav"]), 2);
        assert_eq!(set.add_files(["/a/one.mp3"]), 0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn explicit_selection_is_not_filtered() {
        let mut set = FileSet::new();
        set.add_files(["/a/notes.txt"]);
        assert_eq!(names(&set), vec!["notes.txt"]);
    }

    #[test]
    fn folder_scan_keeps_only_recognized_extensions() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.MP3");
        touch(tmp.path(), "nested/deeper/b.flac");
        touch(tmp.path(), "nested/c.wma");
        touch(tmp.path(), "nested/cover.jpg");
        touch(tmp.path(), "notes.txt");

        let mut set = FileSet::new();
        let added = set.add_folder(tmp.path()).unwrap();

        assert_eq!(added, 3);
        let mut got = names(&set);
        got.sort();
        assert_eq!(got, vec!["a.MP3", "b.flac", "c.wma"]);
    }

    #[test]
    fn overlapping_scans_do_not_duplicate() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "x/one.ogg");
        touch(tmp.path(), "two.m4a");

        let mut set = FileSet::new();
        assert_eq!(set.add_folder(tmp.path()).unwrap(), 2);
        assert_eq!(set.add_folder(tmp.path().join("x")).unwrap(), 0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iteration_is_sorted_by_path() {
        let mut set = FileSet::new();
        set.add_files(["/z/b.mp3", "/a/c.mp3", "/m/a.mp3"]);
        let paths: Vec<_> = set.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/a/c.mp3"),
                PathBuf::from("/m/a.mp3"),
                PathBuf::from("/z/b.mp3"),
            ]
        );
    }

    #[test]
    fn clear_empties_the_set() {
        let mut set = FileSet::new();
        set.clear();
        assert!(set.is_empty());

        set.add_files(["/a.mp3", "/b.mp3"]);
        set.clear();
        assert!(set.is_empty());

        set.add_files(["/a.mp3"]);
        assert!(set.remove(&InputFile::new("/a.mp3")));
        assert!(set.is_empty());
    }

    #[test]
    fn missing_folder_is_reported() {
        let tmp = TempDir::new().unwrap();
        let mut set = FileSet::new();
        let err = set.add_folder(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConvertError::InputDirectoryMissing(_)));
    }

    #[test]
    fn scan_directory_is_flat_and_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.M4A");
        touch(tmp.path(), "a.m4a");
        touch(tmp.path(), "c.mp3");
        touch(tmp.path(), "sub/d.m4a");

        let files = scan_directory(tmp.path(), "m4a").unwrap();
        assert_eq!(files, vec![tmp.path().join("a.m4a"), tmp.path().join("b.M4A")]);
    }

    #[test]
    fn scan_directory_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let err = scan_directory(tmp.path().join("missing"), "m4a").unwrap_err();
        assert!(matches!(err, ConvertError::InputDirectoryMissing(_)));
    }
}
