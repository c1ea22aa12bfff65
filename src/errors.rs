use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkmapError {
    NotFound(String),
    GenerationExhausted(String),
    Conflict(String),
    FileOperation(String),
    Serialization(String),
    Config(String),
    PersistenceClosed(String),
}

impl LinkmapError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkmapError::NotFound(_) => "E001",
            LinkmapError::GenerationExhausted(_) => "E002",
            LinkmapError::Conflict(_) => "E003",
            LinkmapError::FileOperation(_) => "E004",
            LinkmapError::Serialization(_) => "E005",
            LinkmapError::Config(_) => "E006",
            LinkmapError::PersistenceClosed(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkmapError::NotFound(_) => "Resource Not Found",
            LinkmapError::GenerationExhausted(_) => "Code Space Exhausted",
            LinkmapError::Conflict(_) => "Mapping Conflict",
            LinkmapError::FileOperation(_) => "File Operation Error",
            LinkmapError::Serialization(_) => "Serialization Error",
            LinkmapError::Config(_) => "Configuration Error",
            LinkmapError::PersistenceClosed(_) => "Persistence Closed",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkmapError::NotFound(msg) => msg,
            LinkmapError::GenerationExhausted(msg) => msg,
            LinkmapError::Conflict(msg) => msg,
            LinkmapError::FileOperation(msg) => msg,
            LinkmapError::Serialization(msg) => msg,
            LinkmapError::Config(msg) => msg,
            LinkmapError::PersistenceClosed(msg) => msg,
        }
    }

    /// Whether the error describes a broken internal invariant rather than
    /// a caller-visible outcome.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            LinkmapError::Conflict(_) | LinkmapError::PersistenceClosed(_)
        )
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkmapError {}

// 便捷的构造函数
impl LinkmapError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkmapError::NotFound(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkmapError::GenerationExhausted(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkmapError::Conflict(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkmapError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkmapError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkmapError::Config(msg.into())
    }

    pub fn persistence_closed<T: Into<String>>(msg: T) -> Self {
        LinkmapError::PersistenceClosed(msg.into())
    }
}

impl From<std::io::Error> for LinkmapError {
    fn from(err: std::io::Error) -> Self {
        LinkmapError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkmapError {
    fn from(err: serde_json::Error) -> Self {
        LinkmapError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for LinkmapError {
    fn from(err: config::ConfigError) -> Self {
        LinkmapError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            LinkmapError::not_found("x"),
            LinkmapError::generation_exhausted("x"),
            LinkmapError::conflict("x"),
            LinkmapError::file_operation("x"),
            LinkmapError::serialization("x"),
            LinkmapError::config("x"),
            LinkmapError::persistence_closed("x"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = LinkmapError::not_found("code 'zz' is not assigned");
        assert_eq!(
            err.to_string(),
            "Resource Not Found: code 'zz' is not assigned"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LinkmapError = io.into();
        assert!(matches!(err, LinkmapError::FileOperation(_)));
        assert!(err.message().contains("denied"));
    }

    #[test]
    fn test_internal_classification() {
        assert!(LinkmapError::conflict("dup").is_internal());
        assert!(!LinkmapError::not_found("zz").is_internal());
        assert!(!LinkmapError::generation_exhausted("full").is_internal());
    }
}
