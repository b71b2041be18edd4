//! Path helpers for locating shelfdesk's data and user-supplied files.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SHELFDESK_DATA_DIR";

/// Returns the directory holding traces and other local state.
///
/// Resolution order: `$SHELFDESK_DATA_DIR`, then
/// `$HOME/.local/share/shelfdesk`, then `./.shelfdesk` when `HOME` is unset.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    home_dir().map_or_else(
        || PathBuf::from(".shelfdesk"),
        |home| home.join(".local").join("share").join("shelfdesk"),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when `HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use shelfdesk::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/srv/catalog.json"), "/srv/catalog.json");
/// assert_eq!(expand_tilde("notes~/a"), "notes~/a");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = home_dir() else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}
