//! Record data structures
//!
//! Field names follow the persisted document layout (`modifiedAt`, `isFavorite`,
//! `parentID`, ...). Fields that older documents may lack carry serde defaults;
//! see `codec` for the full resolution rules.

use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Content kind of a library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    Text,
    Markdown,
    Code,
    Image,
    Pdf,
    /// Also absorbs kinds written by newer versions that this build does not know
    #[serde(other)]
    Other,
}

impl FileKind {
    /// Every kind, in display order
    pub const ALL: [Self; 7] = [
        Self::Folder,
        Self::Text,
        Self::Markdown,
        Self::Code,
        Self::Image,
        Self::Pdf,
        Self::Other,
    ];

    /// Guess the kind of a file from its extension
    ///
    /// # Examples
    /// ```
    /// # use smartfiles::model::FileKind;
    /// assert_eq!(FileKind::from_path("notes.MD"), FileKind::Markdown);
    /// assert_eq!(FileKind::from_path("photo.jpeg"), FileKind::Image);
    /// assert_eq!(FileKind::from_path("archive.tar"), FileKind::Other);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Self::Text,
            "md" => Self::Markdown,
            "swift" | "js" | "py" | "html" | "rs" => Self::Code,
            "png" | "jpg" | "jpeg" | "gif" => Self::Image,
            "pdf" => Self::Pdf,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }

    /// Lowercase name as used in documents and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Code => "code",
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named label that can be assigned to any number of items
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "colorHex", default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>, color_hex: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color_hex,
        }
    }

    /// Create a tag with a color derived from its freshly generated id
    #[must_use]
    pub fn with_generated_color(name: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        let bytes = id.as_bytes();
        Self {
            id,
            name: name.into(),
            color_hex: Some(format!("#{:02X}{:02X}{:02X}", bytes[0], bytes[1], bytes[2])),
        }
    }
}

/// One entry of an item's edit history
///
/// Versions are created once and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileVersion {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "username")]
    pub author: String,
    #[serde(rename = "changelog")]
    pub note: String,
}

impl FileVersion {
    #[must_use]
    pub fn new(author: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            author: author.into(),
            note: note.into(),
        }
    }
}

/// A file or folder tracked by the library
///
/// `is_folder` is derived from `kind`; it is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Location of the blob holding the file's bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub is_protected: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<FileVersion>>,
    /// `None` places the item at the library root
    #[serde(rename = "parentID", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl FileItem {
    /// Create a new item with a fresh id, no blob and the current time
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FileKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            url: None,
            size: Some(0),
            modified_at: now,
            is_favorite: false,
            tags: Vec::new(),
            is_protected: false,
            created_at: now,
            accessed_at: None,
            versions: None,
            parent_id: None,
        }
    }

    /// Create a folder under `parent_id`
    #[must_use]
    pub fn folder(name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self::new(name, FileKind::Folder).with_parent(parent_id)
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: Option<Uuid>) -> Self {
        self.parent_id = parent_id;
        self
    }

    #[must_use]
    pub fn with_blob(mut self, url: PathBuf, size: u64) -> Self {
        self.url = Some(url);
        self.size = Some(size);
        self
    }

    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    #[must_use]
    pub fn has_tag(&self, tag_id: Uuid) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Names of the tags assigned to this item
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    /// Assigned tags that still exist in `catalog`
    ///
    /// Deleting a tag does not strip it from items; this is where such
    /// dangling assignments are dropped.
    #[must_use]
    pub fn live_tags<'a>(&self, catalog: &'a [Tag]) -> Vec<&'a Tag> {
        self.tags
            .iter()
            .filter_map(|assigned| catalog.iter().find(|t| t.id == assigned.id))
            .collect()
    }

    /// Assign a tag, keeping the set free of duplicate ids
    ///
    /// Returns `false` when the tag was already assigned.
    pub fn assign_tag(&mut self, tag: Tag) -> bool {
        if self.has_tag(tag.id) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Returns `false` when the tag was not assigned.
    pub fn unassign_tag(&mut self, tag_id: Uuid) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.id != tag_id);
        self.tags.len() != before
    }

    /// Append a version record to the item's history
    pub fn record_version(&mut self, author: impl Into<String>, note: impl Into<String>) -> &FileVersion {
        let versions = self.versions.get_or_insert_with(Vec::new);
        versions.push(FileVersion::new(author, note));
        &versions[versions.len() - 1]
    }

    /// Human readable size, e.g. `12.3 KB`
    #[must_use]
    pub fn size_string(&self) -> String {
        Byte::from_u64(self.size.unwrap_or(0))
            .get_appropriate_unit(UnitType::Decimal)
            .to_string()
    }
}

/// Built-in templates offered when creating a new file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTemplate {
    pub display_name: &'static str,
    pub extension: &'static str,
    pub content: &'static str,
    pub kind: FileKind,
}

impl FileTemplate {
    pub const CODE: Self = Self {
        display_name: "Swift File",
        extension: "swift",
        content: "import Foundation\n\n",
        kind: FileKind::Code,
    };

    pub const TEXT: Self = Self {
        display_name: "Text File",
        extension: "txt",
        content: "",
        kind: FileKind::Text,
    };

    pub const MARKDOWN: Self = Self {
        display_name: "Markdown File",
        extension: "md",
        content: "# New Document\n\n",
        kind: FileKind::Markdown,
    };

    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::CODE, Self::TEXT, Self::MARKDOWN]
    }

    /// Look up the template producing files of `kind`
    #[must_use]
    pub fn for_kind(kind: FileKind) -> Option<Self> {
        Self::all().into_iter().find(|t| t.kind == kind)
    }

    /// Final file name for `name`, appending the extension unless already present
    ///
    /// # Examples
    /// ```
    /// # use smartfiles::model::FileTemplate;
    /// assert_eq!(FileTemplate::MARKDOWN.file_name("notes"), "notes.md");
    /// assert_eq!(FileTemplate::MARKDOWN.file_name("notes.MD"), "notes.MD");
    /// ```
    #[must_use]
    pub fn file_name(&self, name: &str) -> String {
        if name.to_lowercase().ends_with(&format!(".{}", self.extension)) {
            name.to_string()
        } else {
            format!("{name}.{}", self.extension)
        }
    }
}
