use std::fs;
use std::path::PathBuf;

use gifstudio_application::{ApplicationError, ArtifactStore, StoredArtifact};

/// Keeps result artifacts as files under the app's cache directory. Each
/// result slot owns exactly one artifact; `remove` is the release half of
/// that ownership.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredArtifact, ApplicationError> {
        fs::create_dir_all(&self.root).map_err(|error| ApplicationError::Io(error.to_string()))?;
        let path = self.root.join(file_name);
        fs::write(&path, bytes).map_err(|error| ApplicationError::Io(error.to_string()))?;
        Ok(StoredArtifact { path })
    }

    fn remove(&self, artifact: &StoredArtifact) -> Result<(), ApplicationError> {
        if artifact.path.exists() {
            fs::remove_file(&artifact.path)
                .map_err(|error| ApplicationError::Io(error.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn stores_and_releases_artifacts() {
        let dir = TempDir::new().expect("tempdir");
        let store = FsArtifactStore::new(dir.path().join("results"));

        let artifact = store.store("1-frames.zip", b"archive bytes").expect("store");
        assert_eq!(
            fs::read(&artifact.path).expect("read back"),
            b"archive bytes"
        );

        store.remove(&artifact).expect("remove");
        assert!(!artifact.path.exists());
    }

    #[test]
    fn removing_an_already_gone_artifact_is_not_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());

        let artifact = StoredArtifact {
            path: dir.path().join("missing.gif"),
        };
        store.remove(&artifact).expect("remove missing");
    }

    #[test]
    fn replacement_leaves_only_the_new_artifact() {
        let dir = TempDir::new().expect("tempdir");
        let store = FsArtifactStore::new(dir.path());

        let old = store.store("1-frames.gif", b"old").expect("store old");
        let new = store.store("2-frames.gif", b"new").expect("store new");
        store.remove(&old).expect("release old");

        assert!(!old.path.exists());
        assert_eq!(fs::read(&new.path).expect("read new"), b"new");
    }
}
