use crate::generator::PaperShape;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default assessment length: 60 minutes, as printed on the intro card.
pub const DEFAULT_DURATION_SECS: u32 = 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub duration_secs: u32,
    pub instant_feedback: bool,
    pub choice_questions: usize,
    pub statement_groups: usize,
    pub fill_questions: usize,
    pub course_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
            instant_feedback: true,
            choice_questions: 12,
            statement_groups: 4,
            fill_questions: 6,
            course_label: "Grade 7 Mathematics".to_string(),
        }
    }
}

impl Config {
    pub fn paper_shape(&self) -> PaperShape {
        PaperShape {
            choice_questions: self.choice_questions,
            statement_groups: self.statement_groups,
            fill_questions: self.fill_questions,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "mathdrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("mathdrill_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
