//! # inputs
//!
//! why: TLC needs the trace module, its config and the user's spec side by side in one directory
//! relations: written by the repl-trace-checker binary with render.rs output
//! what: TlcInputs, temporary or persisted, with atomic file writes

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::TempDir;

pub const SPEC_FILENAME: &str = "Trace.tla";
pub const CONFIG_FILENAME: &str = "Trace.cfg";

/// directory holding TLC's inputs
///
/// a temporary directory is deleted when this value is dropped.
pub struct TlcInputs {
    dir: PathBuf,
    /// keeps the temporary directory alive
    _temp: Option<TempDir>,
}

impl TlcInputs {
    /// inputs in the working directory if `permanent`, otherwise in a fresh temporary directory
    pub fn create(permanent: bool) -> io::Result<Self> {
        if permanent {
            Ok(Self::in_dir(std::env::current_dir()?))
        } else {
            let temp = TempDir::new()?;
            Ok(Self {
                dir: temp.path().to_path_buf(),
                _temp: Some(temp),
            })
        }
    }

    /// inputs in an existing directory, never deleted
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            _temp: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_temporary(&self) -> bool {
        self._temp.is_some()
    }

    pub fn spec_path(&self) -> PathBuf {
        self.dir.join(SPEC_FILENAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILENAME)
    }

    pub fn write_spec(&self, text: &str) -> io::Result<PathBuf> {
        let path = self.spec_path();
        write_atomic(&path, text)?;
        Ok(path)
    }

    pub fn write_config(&self, text: &str) -> io::Result<PathBuf> {
        let path = self.config_path();
        write_atomic(&path, text)?;
        Ok(path)
    }

    /// copy the user's spec next to the trace module
    ///
    /// returns `None` when the TLA+ spec already lives in this directory.
    pub fn copy_spec_file(&self, spec_file: &Path) -> io::Result<Option<PathBuf>> {
        let file_name = spec_file
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "spec path has no file name"))?;
        let target = self.dir.join(file_name);

        if target.exists() && fs::canonicalize(&target)? == fs::canonicalize(spec_file)? {
            debug!("{} already in {}", spec_file.display(), self.dir.display());
            return Ok(None);
        }

        fs::copy(spec_file, &target)?;
        Ok(Some(target))
    }
}

/// atomic write: write to temp file then rename
///
/// readers of `path` see either the old content or all of `text`.
pub fn write_atomic(path: &Path, text: &str) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn temporary_inputs_are_removed_on_drop() {
        let inputs = TlcInputs::create(false).unwrap();
        assert!(inputs.is_temporary());
        let path = inputs.write_spec("---- MODULE Trace ----\n====\n").unwrap();
        assert!(path.exists());

        let dir = inputs.dir().to_path_buf();
        drop(inputs);
        assert!(!dir.exists());
    }

    #[test]
    fn writes_leave_no_temp_files() {
        let dir = tempdir().unwrap();
        let inputs = TlcInputs::in_dir(dir.path());
        inputs.write_spec("spec").unwrap();
        inputs.write_config("cfg").unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["Trace.cfg", "Trace.tla"]);
        assert_eq!(fs::read_to_string(inputs.config_path()).unwrap(), "cfg");
    }

    #[test]
    fn rewriting_replaces_content() {
        let dir = tempdir().unwrap();
        let inputs = TlcInputs::in_dir(dir.path());
        inputs.write_spec("first").unwrap();
        inputs.write_spec("second").unwrap();
        assert_eq!(fs::read_to_string(inputs.spec_path()).unwrap(), "second");
    }

    #[test]
    fn copies_spec_file() {
        let src = tempdir().unwrap();
        let spec = src.path().join("RaftMongo.tla");
        fs::write(&spec, "---- MODULE RaftMongo ----").unwrap();

        let out = tempdir().unwrap();
        let inputs = TlcInputs::in_dir(out.path());
        let copied = inputs.copy_spec_file(&spec).unwrap().unwrap();
        assert_eq!(fs::read_to_string(copied).unwrap(), "---- MODULE RaftMongo ----");
    }

    #[test]
    fn spec_already_in_place_is_not_copied() {
        let dir = tempdir().unwrap();
        let spec = dir.path().join("RaftMongo.tla");
        fs::write(&spec, "spec").unwrap();

        let inputs = TlcInputs::in_dir(dir.path());
        assert_eq!(inputs.copy_spec_file(&spec).unwrap(), None);
        assert_eq!(fs::read_to_string(&spec).unwrap(), "spec");
    }
}
