//! Stateless enumeration and classification over an accessible directory.
//!
//! Every function here operates on a location the caller keeps accessible
//! for the duration of the call (the session holds the active capability).
//! Read failures never surface as errors: a directory that cannot be read
//! scans as empty, an entry that cannot be classified is simply absent.

use std::cmp::Ordering;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use reelkit_model::{DirectoryEntry, EntryKind};

/// Supported media container extensions, matched case-insensitively.
/// Container/format level only: a file with a matching extension but corrupt
/// content still classifies as playable; playback failure is detected later.
pub const PLAYABLE_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "avi", "mkv", "wmv", "flv", "webm", "mpg", "mpeg", "3gp", "ogv", "ts",
    "m2ts", "mts",
];

/// Directory extensions that mark package-like bundles. Navigating into
/// these is never useful, so they are excluded from listings outright.
const BUNDLE_EXTENSIONS: &[&str] = &["app", "bundle", "framework", "photoslibrary"];

/// Extension allow-list check; no content inspection.
pub fn is_playable_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_lowercase();
            PLAYABLE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_bundle_like(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_lowercase();
            BUNDLE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Classify a single location.
///
/// `Container` for directories, `PlayableLeaf` for matching regular files,
/// `None` for everything else: symlinks (and thus link loops), special
/// files, bundles, and anything unreadable.
pub fn classify(path: &Path) -> Option<EntryKind> {
    let metadata = std::fs::symlink_metadata(path).ok()?;
    let file_type = metadata.file_type();

    if file_type.is_dir() {
        if is_bundle_like(path) {
            return None;
        }
        Some(EntryKind::Container)
    } else if file_type.is_file() && is_playable_file(path) {
        Some(EntryKind::PlayableLeaf)
    } else {
        None
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// List the immediate children of `dir`.
///
/// Hidden entries and bundles are excluded. A child directory is included
/// only when something playable exists somewhere beneath it, so the view
/// never offers dead-end navigation. Sorted case-insensitively ascending by
/// display name; any directory-before-file policy is left to presentation.
pub fn list_shallow(dir: &Path) -> Vec<DirectoryEntry> {
    let reader = match std::fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot read directory; scanning as empty");
            return Vec::new();
        }
    };

    let mut entries: Vec<DirectoryEntry> = Vec::new();

    for child in reader.flatten() {
        let name = child.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let location = child.path();
        match classify(&location) {
            Some(EntryKind::Container) => {
                if contains_playable(&location) {
                    entries.push(DirectoryEntry {
                        location,
                        display_name: name,
                        kind: EntryKind::Container,
                        size_bytes: None,
                    });
                } else {
                    debug!(dir = %location.display(), "skipping directory with no playable content");
                }
            }
            Some(EntryKind::PlayableLeaf) => {
                let size_bytes = child.metadata().map(|m| m.len()).ok();
                entries.push(DirectoryEntry {
                    location,
                    display_name: name,
                    kind: EntryKind::PlayableLeaf,
                    size_bytes,
                });
            }
            None => {}
        }
    }

    entries.sort_by(|a, b| compare_names(&a.display_name, &b.display_name));
    entries
}

/// Whether anything playable exists anywhere beneath `dir`.
///
/// Short-circuits on the first hit; the worst case (no playable content) is
/// a full subtree walk. Hidden subtrees and bundles are pruned.
pub fn contains_playable(dir: &Path) -> bool {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let hidden = entry
                .file_name()
                .to_str()
                .map(is_hidden)
                .unwrap_or(false);
            !hidden && !(entry.file_type().is_dir() && is_bundle_like(entry.path()))
        })
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_type().is_file() && is_playable_file(entry.path()))
}

/// Flat listing of `root`: every immediate subdirectory reported once as a
/// `Container` (without content filtering and without expanding it), every
/// playable file a `PlayableLeaf`. Sorted directories first, then files,
/// each bucket case-insensitively ascending.
pub fn list_flat_recursive(root: &Path) -> Vec<DirectoryEntry> {
    let reader = match std::fs::read_dir(root) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(dir = %root.display(), error = %e, "cannot read directory; scanning as empty");
            return Vec::new();
        }
    };

    let mut entries: Vec<DirectoryEntry> = Vec::new();

    for child in reader.flatten() {
        let name = child.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }

        let location = child.path();
        match classify(&location) {
            Some(EntryKind::Container) => entries.push(DirectoryEntry {
                location,
                display_name: name,
                kind: EntryKind::Container,
                size_bytes: None,
            }),
            Some(EntryKind::PlayableLeaf) => {
                let size_bytes = child.metadata().map(|m| m.len()).ok();
                entries.push(DirectoryEntry {
                    location,
                    display_name: name,
                    kind: EntryKind::PlayableLeaf,
                    size_bytes,
                });
            }
            None => {}
        }
    }

    entries.sort_by(|a, b| match (a.kind, b.kind) {
        (EntryKind::Container, EntryKind::PlayableLeaf) => Ordering::Less,
        (EntryKind::PlayableLeaf, EntryKind::Container) => Ordering::Greater,
        _ => compare_names(&a.display_name, &b.display_name),
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn playable_extension_matching_is_case_insensitive() {
        assert!(is_playable_file(Path::new("movie.mp4")));
        assert!(is_playable_file(Path::new("MOVIE.MKV")));
        assert!(is_playable_file(Path::new("clip.WebM")));
        assert!(!is_playable_file(Path::new("cover.jpg")));
        assert!(!is_playable_file(Path::new("notes.txt")));
        assert!(!is_playable_file(Path::new("no_extension")));
    }

    #[test]
    fn classify_distinguishes_containers_and_leaves() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("season1");
        fs::create_dir(&dir).unwrap();
        fs::write(temp.path().join("clip.mkv"), b"x").unwrap();
        fs::write(temp.path().join("poster.png"), b"x").unwrap();

        assert_eq!(classify(&dir), Some(EntryKind::Container));
        assert_eq!(
            classify(&temp.path().join("clip.mkv")),
            Some(EntryKind::PlayableLeaf)
        );
        assert_eq!(classify(&temp.path().join("poster.png")), None);
        assert_eq!(classify(&temp.path().join("missing")), None);
    }

    #[test]
    fn shallow_listing_excludes_empty_subdirectories() {
        // A video next to an empty subfolder: only the video shows up.
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("movie.mp4"), b"fake video").unwrap();
        fs::create_dir(temp.path().join("empty")).unwrap();

        let entries = list_shallow(temp.path());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "movie.mp4");
        assert_eq!(entries[0].kind, EntryKind::PlayableLeaf);
        assert_eq!(entries[0].size_bytes, Some(10));
    }

    #[test]
    fn shallow_listing_includes_directories_with_nested_media() {
        // Media buried one level down keeps its parent navigable.
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("A");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("clip.mkv"), b"x").unwrap();

        let top = list_shallow(temp.path());
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].display_name, "A");
        assert_eq!(top[0].kind, EntryKind::Container);
        assert_eq!(top[0].size_bytes, None);

        let inner = list_shallow(&nested);
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].display_name, "clip.mkv");
        assert_eq!(inner[0].kind, EntryKind::PlayableLeaf);
    }

    #[test]
    fn shallow_listing_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden.mp4"), b"x").unwrap();
        fs::write(temp.path().join("visible.mp4"), b"x").unwrap();
        fs::create_dir(temp.path().join(".cache")).unwrap();
        fs::write(temp.path().join(".cache/buried.mkv"), b"x").unwrap();

        let entries = list_shallow(temp.path());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "visible.mp4");
    }

    #[test]
    fn shallow_listing_sorts_case_insensitively() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("banana.mp4"), b"x").unwrap();
        fs::write(temp.path().join("Apple.mp4"), b"x").unwrap();
        fs::write(temp.path().join("cherry.mp4"), b"x").unwrap();

        let names: Vec<_> = list_shallow(temp.path())
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names, vec!["Apple.mp4", "banana.mp4", "cherry.mp4"]);
    }

    #[test]
    fn unreadable_directory_scans_as_empty() {
        assert!(list_shallow(Path::new("/nonexistent/path")).is_empty());
        assert!(list_flat_recursive(Path::new("/nonexistent/path")).is_empty());
        assert!(!contains_playable(Path::new("/nonexistent/path")));
    }

    #[test]
    fn contains_playable_finds_media_at_any_depth() {
        let temp = TempDir::new().unwrap();
        let deep = temp.path().join("a/b/c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("clip.ts"), b"x").unwrap();

        assert!(contains_playable(temp.path()));
    }

    #[test]
    fn contains_playable_ignores_hidden_subtrees() {
        let temp = TempDir::new().unwrap();
        let hidden = temp.path().join(".stash");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("secret.mp4"), b"x").unwrap();
        fs::write(temp.path().join("readme.txt"), b"x").unwrap();

        assert!(!contains_playable(temp.path()));
    }

    #[test]
    fn flat_listing_reports_directories_unexpanded_and_first() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("zeta")).unwrap();
        fs::create_dir(temp.path().join("alpha")).unwrap();
        fs::write(temp.path().join("alpha/nested.mp4"), b"x").unwrap();
        fs::write(temp.path().join("movie.avi"), b"x").unwrap();
        fs::write(temp.path().join("ignored.srt"), b"x").unwrap();

        let entries = list_flat_recursive(temp.path());
        let names: Vec<_> = entries.iter().map(|e| e.display_name.as_str()).collect();

        // Both directories appear (no content filter), neither is expanded,
        // directories sort before files.
        assert_eq!(names, vec!["alpha", "zeta", "movie.avi"]);
        assert_eq!(entries[0].kind, EntryKind::Container);
        assert_eq!(entries[1].kind, EntryKind::Container);
        assert_eq!(entries[2].kind, EntryKind::PlayableLeaf);
    }
}
