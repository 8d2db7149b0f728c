use std::path::{Path, PathBuf};

/// Ordered directories consulted for bare module names.
///
/// First match wins. The interpreter may mutate the list at any time
/// between requests (it is exposed to scripts as `$:`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        SearchPath::default()
    }

    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        dirs.into_iter().map(Into::into).collect()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Append a directory (lowest priority).
    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// Insert a directory at `index`; `0` gives it the highest priority.
    ///
    /// An `index` past the end appends.
    pub fn insert(&mut self, index: usize, dir: impl Into<PathBuf>) {
        let index = index.min(self.dirs.len());
        self.dirs.insert(index, dir.into());
    }

    pub fn clear(&mut self) {
        self.dirs.clear();
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> + '_ {
        self.dirs.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPath {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        SearchPath {
            dirs: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<P: Into<PathBuf>> Extend<P> for SearchPath {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.dirs.extend(iter.into_iter().map(Into::into));
    }
}
