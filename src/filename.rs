use std::path::Path;

use crate::metadata::Metadata;

/// Characters rejected by at least one common filesystem.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const SCENE_TYPE: &str = "scene";
const UNNUMBERED_CHAPTER: &str = "X";

/// Derives the sanitized output stem for a note.
///
/// Scenes are named `{story} Ch{chapter} — {chapter_title}`, everything else by
/// its `title`, or `fallback` (usually the input's own stem) when untitled.
pub(crate) fn derive_stem(metadata: &Metadata, fallback: &str) -> String {
    let stem = if metadata.get_or("type", "") == SCENE_TYPE {
        let story = metadata.get_or("story", "Unknown_Story");
        let chapter = chapter_label(metadata.get_or("chapter", UNNUMBERED_CHAPTER));
        let chapter_title = metadata.get_or("chapter_title", "Untitled");
        format!("{story} Ch{chapter} — {chapter_title}")
    } else {
        match metadata.get_or("title", "").trim() {
            "" => fallback.to_string(),
            title => title.to_string(),
        }
    };

    sanitize(&stem)
}

/// Zero-pads numeric chapters to three digits, `XXX` for anything else.
/// Numbers outside the `i64` range, or with `_` separators, count as non-numeric.
fn chapter_label(chapter: &str) -> String {
    if chapter == UNNUMBERED_CHAPTER {
        return chapter.to_string();
    }
    match chapter.trim().parse::<i64>() {
        Ok(n) => format!("{n:03}"),
        Err(_) => "XXX".to_string(),
    }
}

pub(crate) fn sanitize(name: &str) -> String {
    let cleaned = name.replace(ILLEGAL_CHARS, "");
    match cleaned.trim() {
        "" => "output".to_string(),
        trimmed => trimmed.to_string(),
    }
}

pub(crate) fn fallback_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub(crate) fn output_file_name(stem: &str, format: &str) -> String {
    format!("{stem}.{format}")
}
