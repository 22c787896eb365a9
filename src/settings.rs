use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "wikipolls";
const ENV_PREFIX: &str = "POLLS";

/// Where tables are read from and results go.
///
/// Built from defaults, then `wikipolls.toml` (optional), then `POLLS_*`
/// environment variables. Command line flags are applied on top by `main`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_files")]
    pub files: Vec<String>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_files() -> Vec<String> {
    (2020..=2025).map(|y| format!("{}.txt", y)).collect()
}

fn default_output() -> PathBuf {
    PathBuf::from("output.csv")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/polls.sqlite")
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .try_parsing(true)
                        .list_separator(",")
                        .with_list_parse_key("files"),
                ),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")
    }

    /// Input paths: explicit ones as given, otherwise the configured files
    /// resolved against `input_dir`.
    pub fn input_paths(&self, explicit: &[PathBuf]) -> Vec<PathBuf> {
        if !explicit.is_empty() {
            return explicit.to_vec();
        }
        self.files
            .iter()
            .map(|f| resolve(&self.input_dir, f))
            .collect()
    }
}

fn resolve(dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_config(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn defaults() {
        let s = from_toml("");
        assert_eq!(s.input_dir, PathBuf::from("data"));
        assert_eq!(s.files.len(), 6);
        assert_eq!(s.files[0], "2020.txt");
        assert_eq!(s.files[5], "2025.txt");
        assert_eq!(s.output, PathBuf::from("output.csv"));
        assert_eq!(s.db_path, PathBuf::from("data/polls.sqlite"));
    }

    #[test]
    fn file_overrides() {
        let s = from_toml(
            r#"
            input_dir = "tables"
            files = ["2024.txt"]
            output = "polls.csv"
            "#,
        );
        assert_eq!(s.input_paths(&[]), vec![PathBuf::from("tables/2024.txt")]);
        assert_eq!(s.output, PathBuf::from("polls.csv"));
        assert_eq!(s.db_path, PathBuf::from("data/polls.sqlite"));
    }

    #[test]
    fn explicit_paths_win() {
        let s = from_toml("");
        let explicit = vec![PathBuf::from("x.txt")];
        assert_eq!(s.input_paths(&explicit), explicit);
    }

    #[test]
    fn absolute_files_are_not_joined() {
        let s = from_toml(r#"files = ["/tmp/2024.txt", "2025.txt"]"#);
        assert_eq!(
            s.input_paths(&[]),
            vec![PathBuf::from("/tmp/2024.txt"), PathBuf::from("data/2025.txt")]
        );
    }
}
