use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

use crate::language::Language;

pub const DEFAULT_API_URL: &str = "https://emkc.org/api/v2/piston";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    /// Defaults, then the rc file, then the process environment.
    pub fn load() -> Self {
        Self::from_file(&default_config_path()).with_env(env::vars())
    }

    /// Defaults overlaid by the rc file at `path`.
    pub fn from_file(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            if let Ok(file) = fs::File::open(path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        Self { inner: map }
    }

    /// Overlay environment-style pairs; only known keys and `PISTON_*` are taken.
    pub fn with_env(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        for (k, v) in vars {
            if is_config_key(&k) {
                self.inner.insert(k, v);
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse::<i64>().ok())
    }

    pub fn api_url(&self) -> String {
        self.get("PISTON_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("REQUEST_TIMEOUT").unwrap_or(15))
    }

    /// Falls back to the first supported language on a missing or unknown value.
    pub fn default_language(&self) -> Language {
        self.get("DEFAULT_LANGUAGE")
            .and_then(|v| v.parse::<Language>().ok())
            .unwrap_or_default()
    }

    pub fn log_file(&self) -> PathBuf {
        self.get("LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("piston_tui").join("piston_tui.log"))
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "REQUEST_TIMEOUT",
        "COMPILE_TIMEOUT",
        "RUN_TIMEOUT",
        "COMPILE_MEMORY_LIMIT",
        "RUN_MEMORY_LIMIT",
        "DEFAULT_LANGUAGE",
        "PRETTIFY_OUTPUT",
        "LOG_FILE",
    ];

    KEYS.contains(&k) || k.starts_with("PISTON_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("piston_tui").join(".pistonrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("PISTON_API_URL".into(), DEFAULT_API_URL.into());

    // Seconds for the whole HTTP call; milliseconds for the service-side stages
    m.insert("REQUEST_TIMEOUT".into(), "15".into());
    m.insert("COMPILE_TIMEOUT".into(), "10000".into());
    m.insert("RUN_TIMEOUT".into(), "3000".into());
    m.insert("COMPILE_MEMORY_LIMIT".into(), "-1".into());
    m.insert("RUN_MEMORY_LIMIT".into(), "-1".into());

    m.insert("DEFAULT_LANGUAGE".into(), Language::default().name().into());
    m.insert("PRETTIFY_OUTPUT".into(), "true".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::from_file(&dir.path().join("missing"));
        assert_eq!(cfg.get_u64("COMPILE_TIMEOUT"), Some(10000));
        assert_eq!(cfg.get_u64("RUN_TIMEOUT"), Some(3000));
        assert_eq!(cfg.get_i64("RUN_MEMORY_LIMIT"), Some(-1));
    }

    #[test]
    fn rc_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".pistonrc");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "# comment").unwrap();
        writeln!(f, "RUN_TIMEOUT = 5000").unwrap();
        writeln!(f, "DEFAULT_LANGUAGE=golang").unwrap();
        writeln!(f).unwrap();

        let cfg = Config::from_file(&path);
        assert_eq!(cfg.get_u64("RUN_TIMEOUT"), Some(5000));
        assert_eq!(cfg.default_language(), Language::Go);
    }

    #[test]
    fn env_overrides_rc_file_for_known_keys_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".pistonrc");
        fs::write(&path, "RUN_TIMEOUT=5000\n").unwrap();

        let cfg = Config::from_file(&path).with_env([
            ("RUN_TIMEOUT".to_string(), "700".to_string()),
            ("PISTON_API_URL".to_string(), "http://localhost:2000/api/v2".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ]);
        assert_eq!(cfg.get_u64("RUN_TIMEOUT"), Some(700));
        assert_eq!(cfg.api_url(), "http://localhost:2000/api/v2");
        assert_eq!(cfg.get("HOME"), None);
    }

    #[test]
    fn unknown_default_language_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::from_file(&dir.path().join("missing"));
        cfg.set("DEFAULT_LANGUAGE", "fortran");
        assert_eq!(cfg.default_language(), Language::Python);
    }

    #[test]
    fn blank_api_url_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::from_file(&dir.path().join("missing"));
        cfg.set("PISTON_API_URL", "  ");
        assert_eq!(cfg.api_url(), DEFAULT_API_URL);
    }
}
