/// File categorization for Commodore disk, tape and cartridge images.
///
/// This module defines the fixed category table (one category per image
/// format, keyed by file extension) and the first-character bucket rule that
/// together decide where a file lands in the destination tree.
///
/// # Examples
///
/// ```
/// use retrosort::file_category::{Category, CategoryMatcher, bucket_for};
///
/// let matcher = CategoryMatcher::new();
/// assert!(matcher.matches(Category::Prg, "GAME.prg"));
/// assert!(matcher.matches(Category::Prg, "Photo.PRG"));
/// assert_eq!(bucket_for("apple.prg"), "A");
/// assert_eq!(bucket_for("7zip.t64"), "0_9");
/// ```
use glob::{MatchOptions, Pattern};
use std::collections::HashMap;

/// Bucket for filenames that do not start with an alphabetic character.
pub const FALLBACK_BUCKET: &str = "0_9";

/// Represents one entry of the fixed category table.
///
/// Each category corresponds to a Commodore image format and owns exactly
/// one file-extension pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// 1541 disk images (.d64)
    D64,
    /// GCR-encoded disk images (.g64)
    G64,
    /// Program files (.prg)
    Prg,
    /// Tape archive images (.t64)
    T64,
    /// .f64 disk images
    F64,
    /// Cartridge images (.crt)
    Crt,
    /// Raw tape images (.tap)
    Tap,
    /// 1581 disk images (.d81)
    D81,
    /// 1571 disk images (.d71)
    D71,
}

impl Category {
    /// All categories in table order. The traversal driver iterates this
    /// array outer-most, so the order decides which files are processed
    /// first.
    pub const ALL: [Category; 9] = [
        Category::D64,
        Category::G64,
        Category::Prg,
        Category::T64,
        Category::F64,
        Category::Crt,
        Category::Tap,
        Category::D81,
        Category::D71,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use retrosort::file_category::Category;
    ///
    /// assert_eq!(Category::D64.dir_name(), "D64");
    /// assert_eq!(Category::Prg.dir_name(), "PRG");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::D64 => "D64",
            Category::G64 => "G64",
            Category::Prg => "PRG",
            Category::T64 => "T64",
            Category::F64 => "F64",
            Category::Crt => "CRT",
            Category::Tap => "TAP",
            Category::D81 => "D81",
            Category::D71 => "D71",
        }
    }

    /// Returns the glob-style filename pattern for this category.
    pub fn pattern(&self) -> &'static str {
        match self {
            Category::D64 => "*.d64",
            Category::G64 => "*.g64",
            Category::Prg => "*.prg",
            Category::T64 => "*.t64",
            Category::F64 => "*.f64",
            Category::Crt => "*.crt",
            Category::Tap => "*.tap",
            Category::D81 => "*.d81",
            Category::D71 => "*.d71",
        }
    }
}

/// Matches filenames against the category table.
///
/// Patterns are compiled once at construction; matching is case-insensitive
/// glob suffix matching, so `GAME.PRG` and `game.prg` classify identically.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    patterns: HashMap<Category, Pattern>,
}

impl CategoryMatcher {
    /// Creates a matcher with every category's pattern compiled.
    pub fn new() -> Self {
        let patterns = Category::ALL
            .iter()
            .map(|category| {
                let pattern =
                    Pattern::new(category.pattern()).expect("Invalid category pattern");
                (*category, pattern)
            })
            .collect();
        Self { patterns }
    }

    /// Tests whether a filename belongs to the given category.
    ///
    /// # Examples
    ///
    /// ```
    /// use retrosort::file_category::{Category, CategoryMatcher};
    ///
    /// let matcher = CategoryMatcher::new();
    /// assert!(matcher.matches(Category::D64, "demo.d64"));
    /// assert!(!matcher.matches(Category::D64, "demo.tap"));
    /// ```
    pub fn matches(&self, category: Category, file_name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::default()
        };
        self.patterns
            .get(&category)
            .is_some_and(|pattern| pattern.matches_with(file_name, options))
    }
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the bucket name for a filename.
///
/// The bucket is the uppercased first character when it is alphabetic,
/// otherwise the literal `"0_9"`. Alphabetic means Unicode-alphabetic
/// (`char::is_alphabetic`), which is broader than ASCII A–Z.
///
/// # Examples
///
/// ```
/// use retrosort::file_category::bucket_for;
///
/// assert_eq!(bucket_for("giana.d64"), "G");
/// assert_eq!(bucket_for("1942.crt"), "0_9");
/// assert_eq!(bucket_for("_intro.prg"), "0_9");
/// ```
pub fn bucket_for(file_name: &str) -> String {
    match file_name.chars().next() {
        Some(first) if first.is_alphabetic() => first.to_uppercase().to_string(),
        _ => FALLBACK_BUCKET.to_string(),
    }
}
