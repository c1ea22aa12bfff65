use serde::{Deserialize, Serialize};

use crate::errors::{LinkmapError, Result};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - store: 数据文件、持久化后端、短码生成策略
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Load from `config.toml` in the working directory plus environment.
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LINKMAP，分隔符：__
    /// 示例：LINKMAP__STORE__DATA_FILE=/var/lib/linkmap/urls.json
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    /// Same as [`StaticConfig::load`] but with an explicit TOML path.
    pub fn load_from(path: &str) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// Strict variant of [`StaticConfig::load_from`]: surfaces parse and
    /// validation failures instead of falling back to defaults.
    pub fn try_load_from(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LINKMAP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<StaticConfig>()?;
        config.store.validate()?;
        Ok(config)
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Persistence backend: `file` or `memory`
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_min_code_length")]
    pub min_code_length: usize,
    #[serde(default = "default_max_code_length")]
    pub max_code_length: usize,
    #[serde(default = "default_attempts_per_length")]
    pub attempts_per_length: usize,
    /// Upper bound for the final flush on shutdown
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_code_length == 0 {
            return Err(LinkmapError::config("store.min_code_length must be >= 1"));
        }
        if self.min_code_length > self.max_code_length {
            return Err(LinkmapError::config(format!(
                "store.min_code_length ({}) exceeds store.max_code_length ({})",
                self.min_code_length, self.max_code_length
            )));
        }
        if self.attempts_per_length == 0 {
            return Err(LinkmapError::config(
                "store.attempts_per_length must be >= 1",
            ));
        }
        if self.backend == "file" && self.data_file.trim().is_empty() {
            return Err(LinkmapError::config(
                "store.data_file is required for the file backend",
            ));
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_backend() -> String {
    "file".to_string()
}

fn default_data_file() -> String {
    "urls.json".to_string()
}

fn default_min_code_length() -> usize {
    1
}

fn default_max_code_length() -> usize {
    9
}

fn default_attempts_per_length() -> usize {
    10
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_file: default_data_file(),
            min_code_length: default_min_code_length(),
            max_code_length: default_max_code_length(),
            attempts_per_length: default_attempts_per_length(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
