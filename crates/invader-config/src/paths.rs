//! Platform-specific paths for user presets.
//!
//! - **User presets**: `~/.config/invader/presets/` (Linux),
//!   `~/Library/Application Support/invader/presets/` (macOS),
//!   `%APPDATA%\invader\presets\` (Windows)

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::factory_presets::get_factory_preset;
use crate::preset::Preset;

/// Application name used for directory paths.
const APP_NAME: &str = "invader";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Create the user presets directory if needed and return it.
pub fn ensure_user_presets_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// Find a preset file by path or name.
///
/// `name` may be a path to an existing file, or a preset name (with or
/// without `.toml`) looked up in the user presets directory.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

/// [`find_preset`] against an explicit presets directory.
pub fn find_preset_in(name: &str, presets_dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let candidate = presets_dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Resolve a preset name the way the command line does.
///
/// Factory presets win, then files found by [`find_preset`]. Anything else
/// is [`ConfigError::PresetNotFound`].
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    resolve_preset_in(name, &user_presets_dir())
}

/// [`resolve_preset`] against an explicit presets directory.
pub fn resolve_preset_in(name: &str, presets_dir: &Path) -> Result<Preset, ConfigError> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }
    match find_preset_in(name, presets_dir) {
        Some(path) => Preset::load(path),
        None => Err(ConfigError::PresetNotFound(name.to_string())),
    }
}

/// List preset files in the user presets directory, sorted by path.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

/// List `.toml` files in `dir`, sorted by path.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Preset name from a file path (the file stem).
///
/// ```rust
/// use invader_config::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/vocal_booth.toml"));
/// assert_eq!(name, Some("vocal_booth".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn presets_dir_is_namespaced() {
        let dir = user_presets_dir();
        assert!(dir.ends_with("invader/presets"));
        assert!(user_config_dir().ends_with("invader"));
    }

    #[test]
    fn find_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("test.toml");
        fs::write(&preset_path, "name = \"test\"").unwrap();

        let found = find_preset(preset_path.to_str().unwrap());
        assert_eq!(found, Some(preset_path));
    }

    #[test]
    fn find_by_name_adds_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("booth.toml"), "name = \"Booth\"").unwrap();

        assert!(find_preset_in("booth", temp_dir.path()).is_some());
        assert!(find_preset_in("booth.toml", temp_dir.path()).is_some());
        assert!(find_preset_in("missing", temp_dir.path()).is_none());
    }

    #[test]
    fn list_only_toml_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let presets = list_presets_in_dir(temp_dir.path());
        let names: Vec<_> = presets.iter().filter_map(|p| preset_name_from_path(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn resolve_prefers_factory_then_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("drums.toml"), "name = \"My Drums\"").unwrap();
        fs::write(temp_dir.path().join("booth.toml"), "name = \"Booth\"").unwrap();

        assert_eq!(resolve_preset_in("drums", temp_dir.path()).unwrap().name, "Drums");
        assert_eq!(resolve_preset_in("booth", temp_dir.path()).unwrap().name, "Booth");
        assert!(matches!(
            resolve_preset_in("missing", temp_dir.path()),
            Err(ConfigError::PresetNotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn resolve_surfaces_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.toml"), "name = ").unwrap();
        assert!(matches!(
            resolve_preset_in("broken", temp_dir.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn list_missing_dir_is_empty() {
        assert!(list_presets_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
