//! The document lifecycle: one open document, the file path it is bound
//! to, and whether unsaved edits exist.
//!
//! There is no separate "nothing loaded" state. A fresh workspace holds an
//! empty, untitled, clean document, and closing returns to exactly that, so
//! every operation is well-defined at all times. Anything that would throw
//! away unsaved edits (open, new, close) takes a [`DirtyResolution`] chosen
//! by the caller; the workspace itself never prompts and never discards
//! silently.
//!
//! Saving backs up the previous file contents first. The backup is a
//! courtesy copy: if it cannot be written the save still goes ahead, and
//! the failure is reported in the [`SaveReport`] for the caller to show as
//! a warning. The document file itself is replaced atomically (temp file
//! in the same directory, then rename), so a crash mid-save cannot leave a
//! half-written document behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{MenuError, Result};
use crate::model::{Document, Section, SectionPatch};
use crate::schema;
use crate::transfer::RemoteTransfer;

/// What to do with unsaved changes when the document is about to be
/// replaced or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyResolution {
    /// Throw the unsaved changes away.
    Discard,
    /// Save to the bound path first; a failed save aborts the operation.
    SaveFirst,
    /// Abort the operation and keep everything as it is.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    Cancelled,
}

/// What happened to the previous file contents during a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    /// Previous contents were copied aside to this path.
    Created(PathBuf),
    /// Nothing to back up; no file existed at the path yet.
    NoPrevious,
    /// The copy failed. The save itself still went ahead.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub backup: BackupStatus,
}

pub struct Workspace {
    document: Document,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Starts unloaded: an empty, untitled, clean document.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            path: None,
            dirty: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the document dirty on behalf of an edit made outside the
    /// mutation wrappers.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // Returns false when the caller chose Cancel while edits were unsaved.
    fn resolve_dirty(&mut self, resolution: DirtyResolution) -> Result<bool> {
        if !self.dirty {
            return Ok(true);
        }
        match resolution {
            DirtyResolution::Cancel => Ok(false),
            DirtyResolution::Discard => Ok(true),
            DirtyResolution::SaveFirst => {
                self.save()?;
                Ok(true)
            }
        }
    }

    /// Replaces the document with the one read from `path`. A read or
    /// parse failure leaves the current document, path, and dirty flag
    /// exactly as they were.
    pub fn open(
        &mut self,
        path: impl AsRef<Path>,
        resolution: DirtyResolution,
    ) -> Result<OpenOutcome> {
        if !self.resolve_dirty(resolution)? {
            return Ok(OpenOutcome::Cancelled);
        }
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let document = schema::parse_document(&raw)?;

        self.document = document;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(OpenOutcome::Opened)
    }

    /// Pulls the document from the remote host and loads it. The loaded
    /// document has no local path; `save_as` binds one.
    pub fn open_remote(
        &mut self,
        remote: &impl RemoteTransfer,
        remote_path: &str,
        resolution: DirtyResolution,
    ) -> Result<OpenOutcome> {
        if !self.resolve_dirty(resolution)? {
            return Ok(OpenOutcome::Cancelled);
        }
        let bytes = remote.download(remote_path)?;
        let raw = String::from_utf8(bytes)
            .map_err(|e| MenuError::Format(format!("remote document is not UTF-8: {}", e)))?;
        let document = schema::parse_document(&raw)?;

        self.document = document;
        self.path = None;
        self.dirty = false;
        Ok(OpenOutcome::Opened)
    }

    /// Replaces the document with a fresh, untitled, empty one.
    pub fn new_document(&mut self, resolution: DirtyResolution) -> Result<OpenOutcome> {
        if !self.resolve_dirty(resolution)? {
            return Ok(OpenOutcome::Cancelled);
        }
        self.document = Document::new();
        self.path = None;
        self.dirty = false;
        Ok(OpenOutcome::Opened)
    }

    /// Returns the workspace to the unloaded state.
    pub fn close(&mut self, resolution: DirtyResolution) -> Result<CloseOutcome> {
        if !self.resolve_dirty(resolution)? {
            return Ok(CloseOutcome::Cancelled);
        }
        self.document = Document::new();
        self.path = None;
        self.dirty = false;
        Ok(CloseOutcome::Closed)
    }

    /// Writes the document to its bound path, backing up whatever was
    /// there before. A backup failure is reported, never raised.
    pub fn save(&mut self) -> Result<SaveReport> {
        let path = self.path.clone().ok_or(MenuError::NoPath)?;

        let content = schema::serialize_document(&self.document)?;
        let backup = back_up_existing(&path);
        write_atomically(&path, &content)?;

        self.dirty = false;
        Ok(SaveReport { path, backup })
    }

    /// Binds the document to `path`, then saves.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<SaveReport> {
        self.path = Some(path.as_ref().to_path_buf());
        self.save()
    }

    /// Uploads the file at the bound path to the remote host. This pushes
    /// the last saved copy; save first to push current edits.
    pub fn push_remote(&self, remote: &impl RemoteTransfer, remote_path: &str) -> Result<()> {
        let path = self.path.as_deref().ok_or(MenuError::NoPath)?;
        remote.upload(path, remote_path)
    }

    // Edits go through the workspace so the dirty flag tracks them. A
    // rejected edit leaves the flag alone.

    pub fn add_section(&mut self, section: Section) -> Result<()> {
        self.document.add_section(section)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_section(&mut self, name: &str) -> Result<Section> {
        let removed = self.document.remove_section(name)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn update_section(&mut self, name: &str, patch: SectionPatch) -> Result<()> {
        self.document.update_section(name, patch)?;
        self.dirty = true;
        Ok(())
    }

    pub fn rename_section(&mut self, old: &str, new: &str) -> Result<()> {
        self.document.rename_section(old, new)?;
        self.dirty = true;
        Ok(())
    }
}

/// Backup name for a document path at the given moment:
/// `menu.json` becomes `menu_2024-01-02-03-04-05.json`, kept alongside the
/// original.
fn backup_path(path: &Path, stamp: DateTime<Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let name = format!("{}_{}{}", stem, stamp.format("%Y-%m-%d-%H-%M-%S"), ext);
    path.with_file_name(name)
}

fn back_up_existing(path: &Path) -> BackupStatus {
    if !path.exists() {
        return BackupStatus::NoPrevious;
    }
    let target = backup_path(path, Local::now());
    match fs::copy(path, &target) {
        Ok(_) => BackupStatus::Created(target),
        Err(e) => BackupStatus::Failed(e.to_string()),
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<()> {
    // The temp file sits next to the target so the rename stays on one
    // filesystem.
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");
    let tmp_file = path.with_file_name(format!(".{}-{}.tmp", file_name, std::process::id()));
    fs::write(&tmp_file, content)?;
    fs::rename(&tmp_file, path)?;
    Ok(())
}
