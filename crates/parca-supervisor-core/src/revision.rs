use std::fmt;

use crate::Arch;

pub type Revision = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confinement {
    Classic,
    Strict,
}

impl Confinement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Strict => "strict",
        }
    }

    pub fn is_classic(self) -> bool {
        self == Self::Classic
    }
}

impl fmt::Display for Confinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Supporting a new platform means adding a row here.
const REVISION_CATALOG: &[(Confinement, &str, Revision)] = &[(Confinement::Classic, "amd64", 2587)];

/// Known-compatible package revision for a confinement/architecture pair.
pub fn lookup_revision(confinement: Confinement, arch: &Arch) -> Option<Revision> {
    REVISION_CATALOG
        .iter()
        .find(|(entry_confinement, entry_arch, _)| {
            *entry_confinement == confinement && *entry_arch == arch.as_str()
        })
        .map(|(_, _, revision)| *revision)
}
