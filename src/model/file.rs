/// One entry in a file-browser listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileEntry {
    /// Base name of the entry
    pub name: String,
    /// Full path of the entry
    pub path: String,
    /// True for directories
    #[serde(rename = "isDir")]
    pub is_dir: bool,
    /// Size in bytes, absent for directories
    pub size: Option<i64>,
    /// Child entries, present for expanded directories
    pub children: Option<Vec<FileEntry>>,
}
