use std::fmt;

/// Normalized processor architecture tag used to pick a package revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
    /// Anything we do not recognise, kept verbatim so catalog lookups miss
    /// instead of failing to resolve.
    Other(String),
}

impl Arch {
    pub fn resolve(raw: &str) -> Self {
        match raw {
            "x86_64" | "amd64" => Self::Amd64,
            "aarch64" | "arm64" | "armv8b" | "armv8l" => Self::Arm64,
            other => Self::Other(other.to_string()),
        }
    }

    /// Architecture this binary was built for. It can differ from the machine
    /// for 32-bit or emulated builds, so callers that can run `uname -m`
    /// should resolve that instead and keep this as the fallback.
    pub fn host() -> Self {
        Self::resolve(std::env::consts::ARCH)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
