//! File store - where artifacts are written.
//!
//! The api-files tree is a plain folder hierarchy. Folders are created on
//! demand and files are replaced wholesale: an existing file with the same name
//! is deleted, then the new one is created (last write wins).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FileStoreError, FileStoreResult};
use crate::logs::{log_info_indent, log_success_indent};

/// File name of the folder index copied into new folders.
pub const INDEX_HTML: &str = "index.html";

/// Content type of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    PlainText,
    Json,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::PlainText => "text/plain",
            MimeType::Json => "application/json",
        }
    }
}

/// Handle on a folder of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    path: PathBuf,
}

impl Folder {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A file present in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Destination of artifacts.
pub trait FileStore {
    /// Top folder of the tree.
    fn root(&self) -> FileStoreResult<Folder>;

    /// Child folder `name` of `parent`, created if missing.
    fn get_or_create_folder(&self, parent: &Folder, name: &str) -> FileStoreResult<Folder>;

    /// File `name` in `folder`, if present.
    fn get_file(&self, folder: &Folder, name: &str) -> FileStoreResult<Option<StoredFile>>;

    /// Write `content` as `name` in `folder`, replacing any existing file.
    fn create_or_replace_file(
        &self,
        folder: &Folder,
        name: &str,
        content: &str,
        mime: MimeType,
    ) -> FileStoreResult<StoredFile>;

    /// Walk a chain of folder names from the root.
    fn folder_path(&self, names: &[&str]) -> FileStoreResult<Folder> {
        let mut folder = self.root()?;
        for name in names {
            folder = self.get_or_create_folder(&folder, name)?;
        }
        Ok(folder)
    }
}

/// File store on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    /// Copied as `index.html` into every folder this store creates.
    index_html: Option<PathBuf>,
}

impl LocalFileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            index_html: None,
        }
    }

    pub fn with_index_html(mut self, path: Option<PathBuf>) -> Self {
        self.index_html = path;
        self
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FileStoreError + '_ {
    move |source| FileStoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn check_name(name: &str) -> FileStoreResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FileStoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl FileStore for LocalFileStore {
    fn root(&self) -> FileStoreResult<Folder> {
        fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;
        Ok(Folder {
            path: self.root.clone(),
        })
    }

    fn get_or_create_folder(&self, parent: &Folder, name: &str) -> FileStoreResult<Folder> {
        check_name(name)?;
        let path = parent.path.join(name);

        if path.is_dir() {
            return Ok(Folder { path });
        }
        if path.exists() {
            return Err(FileStoreError::NotAFolder(path));
        }

        fs::create_dir(&path).map_err(io_error(&path))?;
        log_info_indent(format!("📁 Created {}", path.display()), 1);

        if let Some(ref index) = self.index_html {
            let target = path.join(INDEX_HTML);
            fs::copy(index, &target).map_err(io_error(index))?;
        }

        Ok(Folder { path })
    }

    fn get_file(&self, folder: &Folder, name: &str) -> FileStoreResult<Option<StoredFile>> {
        check_name(name)?;
        let path = folder.path.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        let size = fs::metadata(&path).map_err(io_error(&path))?.len();
        Ok(Some(StoredFile { path, size }))
    }

    fn create_or_replace_file(
        &self,
        folder: &Folder,
        name: &str,
        content: &str,
        mime: MimeType,
    ) -> FileStoreResult<StoredFile> {
        if let Some(existing) = self.get_file(folder, name)? {
            fs::remove_file(&existing.path).map_err(io_error(&existing.path))?;
            log_info_indent(format!("Replacing {}", existing.path.display()), 1);
        }

        let path = folder.path.join(name);
        fs::write(&path, content).map_err(io_error(&path))?;
        log_success_indent(
            format!("💾 {} ({}, {} bytes)", path.display(), mime.as_str(), content.len()),
            1,
        );

        Ok(StoredFile {
            path,
            size: content.len() as u64,
        })
    }
}
