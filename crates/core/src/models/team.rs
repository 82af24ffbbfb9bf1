//! Team member model

use serde::{Deserialize, Serialize};

/// A student team member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub initials: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_core: bool,
}

impl TeamMember {
    /// Initials for the avatar placeholder, derived from the name when unset
    pub fn display_initials(&self) -> String {
        if !self.initials.trim().is_empty() {
            return self.initials.trim().to_string();
        }
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// Admin form payload for a team member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDraft {
    pub name: String,
    pub position: String,
    pub bio: String,
    pub initials: String,
    pub photo: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub skills: Vec<String>,
    pub is_core: bool,
}

impl From<&TeamMember> for TeamMemberDraft {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            position: member.position.clone(),
            bio: member.bio.clone().unwrap_or_default(),
            initials: member.initials.clone(),
            photo: member.photo.clone().unwrap_or_default(),
            email: member.email.clone().unwrap_or_default(),
            linkedin: member.linkedin.clone().unwrap_or_default(),
            github: member.github.clone().unwrap_or_default(),
            portfolio: member.portfolio.clone().unwrap_or_default(),
            skills: member.skills.clone(),
            is_core: member.is_core,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_fallback() {
        let member: TeamMember = serde_json::from_str(
            r#"{"_id":"t1","name":"ada lovelace","position":"Lead","isCore":true}"#,
        )
        .unwrap();
        assert!(member.is_core);
        assert_eq!(member.display_initials(), "AL");

        let explicit = TeamMember {
            initials: "AB".into(),
            ..member
        };
        assert_eq!(explicit.display_initials(), "AB");
    }
}
