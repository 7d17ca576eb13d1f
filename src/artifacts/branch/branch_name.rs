use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::errors::RepositoryError;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Validated branch name
///
/// Follows Git's ref-name rules: no leading dot or slash, no `..`, no
/// `.lock` suffix, no `@{` and no control or glob characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> crate::errors::Result<Self> {
        if name.is_empty() {
            return Err(RepositoryError::InvalidBranchName(name));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) {
            Err(RepositoryError::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    pub fn default_branch() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = RepositoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_parse(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("master")]
    #[case("feature/login")]
    #[case("release-1.2")]
    #[case("other")]
    fn accepts_valid_names(#[case] name: &str) {
        assert!(BranchName::try_parse(name.to_string()).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("/leading")]
    #[case("trailing/")]
    #[case("double..dot")]
    #[case("ends.lock")]
    #[case("at@{brace")]
    #[case("with space")]
    #[case("star*")]
    #[case("colon:")]
    #[case("tilde~1")]
    #[case("caret^")]
    fn rejects_invalid_names(#[case] name: &str) {
        assert!(matches!(
            BranchName::try_parse(name.to_string()),
            Err(RepositoryError::InvalidBranchName(_))
        ));
    }

    #[test]
    fn state_files_with_invalid_names_are_rejected() {
        assert!(serde_json::from_str::<BranchName>("\"ok\"").is_ok());
        assert!(serde_json::from_str::<BranchName>("\"bad..name\"").is_err());
    }
}
