//! Logsift 설정
//!
//! CLI가 읽는 TOML 설정 파일을 표현합니다. 모든 필드는 선택적이며,
//! 명령줄 플래그가 설정 파일 값보다 우선합니다.
//!
//! # 설정 파일 예시
//! ```toml
//! filter = "maven"
//! log_file = "/tmp/build-raw.log"
//! colour = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 알려진 필터 이름 (설정 검증용)
const KNOWN_FILTERS: [&str; 5] = ["maven", "java", "hibernate", "svn", "prefix"];

/// Logsift 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiftConfig {
    /// 기본 필터 이름 (maven, java, hibernate, svn, prefix)
    #[serde(default)]
    pub filter: Option<String>,
    /// 원시 입력을 복사할 tee 로그 파일 경로
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// 컬러 출력 여부 (false면 출력 직전에 ANSI 코드 제거)
    #[serde(default = "default_colour")]
    pub colour: bool,
}

fn default_colour() -> bool {
    true
}

impl SiftConfig {
    /// TOML 파일에서 설정을 로드하고 검증합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref name) = self.filter {
            if !KNOWN_FILTERS.contains(&name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "filter".to_owned(),
                    reason: format!("unknown filter '{name}' (expected one of {KNOWN_FILTERS:?})"),
                });
            }
        }

        if let Some(ref path) = self.log_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "log_file".to_owned(),
                    reason: "log file path must not be empty".to_owned(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = SiftConfig::default();
        assert!(config.validate().is_ok());
        // serde 기본값과 달리 Default 파생은 false를 줍니다.
        // 파일 없이 생성한 설정은 CLI가 colour를 직접 결정합니다.
    }

    #[test]
    fn load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "filter = \"maven\"").unwrap();
        writeln!(file, "log_file = \"/tmp/raw.log\"").unwrap();
        writeln!(file, "colour = false").unwrap();

        let config = SiftConfig::load(file.path()).unwrap();
        assert_eq!(config.filter.as_deref(), Some("maven"));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/raw.log")));
        assert!(!config.colour);
    }

    #[test]
    fn load_missing_file_fails() {
        let result = SiftConfig::load("/nonexistent/logsift.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn unknown_filter_name_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "filter = \"gradle\"").unwrap();

        let result = SiftConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn colour_defaults_to_true_when_omitted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "filter = \"svn\"").unwrap();

        let config = SiftConfig::load(file.path()).unwrap();
        assert!(config.colour);
    }
}
