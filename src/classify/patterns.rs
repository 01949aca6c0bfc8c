//! Named sub-pattern extractors over normalized expression text.
//!
//! Each returns the first occurrence's captured value, or `None`.

use regex::Regex;
use std::sync::LazyLock;

/// `File.Contents("<path>")`
static FILE_CONTENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"File\.Contents\("([^"]*)"\)"#).unwrap());

/// `[Item = "<name>"`
static ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[Item\s*=\s*"([^"]*)""#).unwrap());

/// `Contents("<value>"`, any connector prefix
static CONTENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Contents\("([^"]*)""#).unwrap());

/// `Name = "<value>"`
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Name\s*=\s*"([^"]*)""#).unwrap());

fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Workbook path passed to `File.Contents`
pub fn file_contents_path(text: &str) -> Option<String> {
    first_capture(&FILE_CONTENTS, text)
}

/// Sheet name selected with `[Item = ".."`
pub fn item_name(text: &str) -> Option<String> {
    first_capture(&ITEM, text)
}

/// First string argument of any `*.Contents(` call.
///
/// Also matches `File.Contents(`.
pub fn connector_contents_target(text: &str) -> Option<String> {
    first_capture(&CONTENTS, text)
}

/// Value of the first `Name = ".."` assignment
pub fn name_assignment(text: &str) -> Option<String> {
    first_capture(&NAME, text)
}
