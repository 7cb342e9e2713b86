#[cfg(feature = "cli")]
use clap::ValueEnum;

/// File formats a migration script can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum ScriptFormat {
    #[default]
    Yaml,
    Yml,
    Json,
}

impl ScriptFormat {
    pub const ALL: [ScriptFormat; 3] = [ScriptFormat::Yaml, ScriptFormat::Yml, ScriptFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            ScriptFormat::Yaml => "yaml",
            ScriptFormat::Yml => "yml",
            ScriptFormat::Json => "json",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Detect the format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn is_yaml(self) -> bool {
        matches!(self, ScriptFormat::Yaml | ScriptFormat::Yml)
    }
}
