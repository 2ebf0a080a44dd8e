use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum CardshareError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
    Unauthorized(String),
    Forbidden(String),
    ImportParse(String),
    ExportFailed(String),
    InvalidMultipartData(String),
    FileTooLarge(String),
}

impl CardshareError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            CardshareError::DatabaseConfig(_) => "E001",
            CardshareError::DatabaseConnection(_) => "E002",
            CardshareError::DatabaseOperation(_) => "E003",
            CardshareError::FileOperation(_) => "E004",
            CardshareError::Validation(_) => "E005",
            CardshareError::NotFound(_) => "E006",
            CardshareError::Serialization(_) => "E007",
            CardshareError::DateParse(_) => "E008",
            CardshareError::Unauthorized(_) => "E009",
            CardshareError::Forbidden(_) => "E010",
            CardshareError::ImportParse(_) => "E011",
            CardshareError::ExportFailed(_) => "E012",
            CardshareError::InvalidMultipartData(_) => "E013",
            CardshareError::FileTooLarge(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            CardshareError::DatabaseConfig(_) => "Database Configuration Error",
            CardshareError::DatabaseConnection(_) => "Database Connection Error",
            CardshareError::DatabaseOperation(_) => "Database Operation Error",
            CardshareError::FileOperation(_) => "File Operation Error",
            CardshareError::Validation(_) => "Validation Error",
            CardshareError::NotFound(_) => "Resource Not Found",
            CardshareError::Serialization(_) => "Serialization Error",
            CardshareError::DateParse(_) => "Date Parse Error",
            CardshareError::Unauthorized(_) => "Unauthorized",
            CardshareError::Forbidden(_) => "Forbidden",
            CardshareError::ImportParse(_) => "Import Parse Error",
            CardshareError::ExportFailed(_) => "Export Failed",
            CardshareError::InvalidMultipartData(_) => "Invalid Multipart Data",
            CardshareError::FileTooLarge(_) => "File Too Large",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            CardshareError::DatabaseConfig(msg)
            | CardshareError::DatabaseConnection(msg)
            | CardshareError::DatabaseOperation(msg)
            | CardshareError::FileOperation(msg)
            | CardshareError::Validation(msg)
            | CardshareError::NotFound(msg)
            | CardshareError::Serialization(msg)
            | CardshareError::DateParse(msg)
            | CardshareError::Unauthorized(msg)
            | CardshareError::Forbidden(msg)
            | CardshareError::ImportParse(msg)
            | CardshareError::ExportFailed(msg)
            | CardshareError::InvalidMultipartData(msg)
            | CardshareError::FileTooLarge(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            CardshareError::Validation(_)
            | CardshareError::DateParse(_)
            | CardshareError::ImportParse(_)
            | CardshareError::InvalidMultipartData(_) => StatusCode::BAD_REQUEST,
            CardshareError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CardshareError::NotFound(_) => StatusCode::NOT_FOUND,
            CardshareError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CardshareError::Forbidden(_) => StatusCode::FORBIDDEN,
            CardshareError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            CardshareError::DatabaseConfig(_)
            | CardshareError::DatabaseOperation(_)
            | CardshareError::FileOperation(_)
            | CardshareError::Serialization(_)
            | CardshareError::ExportFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
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

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CardshareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CardshareError {}

// 便捷的构造函数
impl CardshareError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        CardshareError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        CardshareError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        CardshareError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        CardshareError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        CardshareError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        CardshareError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        CardshareError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        CardshareError::DateParse(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        CardshareError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        CardshareError::Forbidden(msg.into())
    }

    pub fn import_parse<T: Into<String>>(msg: T) -> Self {
        CardshareError::ImportParse(msg.into())
    }

    pub fn export_failed<T: Into<String>>(msg: T) -> Self {
        CardshareError::ExportFailed(msg.into())
    }

    pub fn invalid_multipart_data<T: Into<String>>(msg: T) -> Self {
        CardshareError::InvalidMultipartData(msg.into())
    }

    pub fn file_too_large<T: Into<String>>(msg: T) -> Self {
        CardshareError::FileTooLarge(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CardshareError {
    fn from(err: sea_orm::DbErr) -> Self {
        CardshareError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CardshareError {
    fn from(err: std::io::Error) -> Self {
        CardshareError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CardshareError {
    fn from(err: serde_json::Error) -> Self {
        CardshareError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for CardshareError {
    fn from(err: csv::Error) -> Self {
        CardshareError::ImportParse(err.to_string())
    }
}

impl From<chrono::ParseError> for CardshareError {
    fn from(err: chrono::ParseError) -> Self {
        CardshareError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CardshareError>;
