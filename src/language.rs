//! Programming language detection
//!
//! Centralizes the extension-to-language mapping used by the segmenter and
//! the dataset builder.

use std::path::Path;

/// Languages with a segmenter, recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Java,
    Cpp,
}

impl Language {
    /// Detect language from a file extension (without the dot).
    ///
    /// # Examples
    ///
    /// ```
    /// use codeslice::language::Language;
    ///
    /// assert_eq!(Language::from_extension("py"), Some(Language::Python));
    /// assert_eq!(Language::from_extension("JAVA"), Some(Language::Java));
    /// assert_eq!(Language::from_extension("hpp"), Some(Language::Cpp));
    /// assert_eq!(Language::from_extension("txt"), None);
    /// ```
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" | "cxx" | "cc" | "hpp" | "hxx" | "hh" | "h" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Detect language from a file path.
    ///
    /// ```
    /// use std::path::Path;
    /// use codeslice::language::Language;
    ///
    /// assert_eq!(Language::from_path(Path::new("src/Main.java")), Some(Language::Java));
    /// assert_eq!(Language::from_path(Path::new("Makefile")), None);
    /// ```
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }
}
