//! Configuration options for Markdown rendering

/// Options for Markdown rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Emphasis delimiter, used for `i` and `em`
    pub em_delimiter: char,

    /// Strong delimiter, used for `b` and `strong`
    pub strong_delimiter: String,

    /// Marker for items of unordered lists
    pub bullet_list_marker: char,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            bullet_list_marker: '*',
        }
    }
}
