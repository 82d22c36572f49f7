use std::{
    fs::File,
    io,
    path::{Component, Path, PathBuf},
};

/// Read-only view of the bundled assets.
///
/// The directory mirrors the online site below its content markers, so a
/// resolved path like `res/ui/panel.png` maps to `<root>/res/ui/panel.png`.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    root: PathBuf,
}

impl AssetBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joins `relative` onto the root. `None` if it would leave the root.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let mut saw_file = false;
        for component in relative.components() {
            match component {
                Component::Normal(_) => saw_file = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        saw_file.then(|| self.root.join(relative))
    }

    /// Opens a bundled asset.
    ///
    /// `Ok(None)` when the asset isn't bundled (missing, a directory, or an
    /// escaping path). Other I/O failures are returned to the caller.
    pub fn open(&self, relative: &str) -> io::Result<Option<File>> {
        let Some(full_path) = self.resolve(relative) else {
            return Ok(None);
        };

        let file = match File::open(&full_path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        if !file.metadata()?.is_file() {
            return Ok(None);
        }

        Ok(Some(file))
    }
}
