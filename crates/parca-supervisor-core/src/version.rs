use crate::SupervisorError;

const PRERELEASE_MARKER: &str = "-next";
const SHORT_COMMIT_LEN: usize = 6;

/// Parses the banner printed by `parca-agent --version`.
///
/// Released builds report `<name>, version <semver> (commit: <hash>)` and map to
/// the bare version token. Pre-release builds carry a `-next` suffix and get the
/// first six characters of the commit appended as build metadata, e.g.
/// `v0.12.0-next+e88871`.
pub fn parse_version_banner(banner: &str) -> Result<String, SupervisorError> {
    let tokens = banner.split_whitespace().collect::<Vec<_>>();
    if tokens.len() < 5 {
        return Err(SupervisorError::MalformedVersionBanner(format!(
            "expected at least 5 tokens, found {} in '{}'",
            tokens.len(),
            banner.trim()
        )));
    }

    let version = tokens[2];
    let commit = tokens[4].trim_end_matches(|ch: char| !ch.is_ascii_alphanumeric());
    if commit.is_empty() {
        return Err(SupervisorError::MalformedVersionBanner(format!(
            "missing commit hash in '{}'",
            banner.trim()
        )));
    }

    if version.contains(PRERELEASE_MARKER) {
        let short_commit = commit.chars().take(SHORT_COMMIT_LEN).collect::<String>();
        return Ok(format!("{version}+{short_commit}"));
    }

    Ok(version.to_string())
}
