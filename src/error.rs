use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Directory '{path}' does not exist")]
    DirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Could not find the zip file '{name}'")]
    ArchiveNotFound { name: String, searched: Vec<String> },

    #[error("Archive operation failed: {message}")]
    Archive {
        message: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ProbeError {
    fn user_message(&self) -> String {
        match self {
            ProbeError::DirectoryNotFound { path } => {
                format!("Error: Directory '{}' does not exist.", path)
            }
            ProbeError::NotADirectory { path } => {
                format!("Error: '{}' is not a directory.", path)
            }
            ProbeError::ArchiveNotFound { name, .. } => {
                format!("Error: Could not find the zip file '{}'", name)
            }
            ProbeError::Archive { message, source } => {
                format!("Failed to extract archive: {} ({})", message, source)
            }
            ProbeError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ProbeError::Cancelled => "Operation was cancelled by user".to_string(),
            ProbeError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ProbeError::DirectoryNotFound { .. } | ProbeError::NotADirectory { .. } => Some(
                "Pass the path of an existing project directory, e.g. analyze-project ./my_app".to_string()
            ),
            ProbeError::ArchiveNotFound { searched, .. } => Some(format!(
                "Please ensure the zip file is in the current directory or a subdirectory. Searched: {}",
                searched.join(", ")
            )),
            ProbeError::Archive { .. } => Some(
                "Check that the archive is a complete, valid zip file.".to_string()
            ),
            ProbeError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config.".to_string()
            ),
            ProbeError::InvalidPath { .. } => Some(
                "The archive contains entries that would be written outside the extraction directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ProbeError {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::Io(io) => ProbeError::Io(io),
            other => ProbeError::Archive {
                message: "Failed to read zip archive".to_string(),
                source: other,
            },
        }
    }
}

impl From<toml::de::Error> for ProbeError {
    fn from(error: toml::de::Error) -> Self {
        ProbeError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
