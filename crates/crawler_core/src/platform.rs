use std::fmt;
use std::str::FromStr;

/// The crawler platforms the console can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    YouTube,
    GitHub,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::YouTube, Platform::GitHub];

    /// Name used on the wire and in storage keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::GitHub => "github",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube Discovery",
            Platform::GitHub => "GitHub Discovery",
        }
    }

    /// Stable key of the persisted configuration record.
    pub fn config_key(self) -> String {
        format!("{}_config", self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" | "yt" => Ok(Platform::YouTube),
            "github" | "gh" => Ok(Platform::GitHub),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}
