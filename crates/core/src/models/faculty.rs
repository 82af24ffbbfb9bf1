//! Faculty mentor model

use serde::{Deserialize, Serialize};

/// A faculty mentor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub designation: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub department: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub specialization: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
}

impl FacultyMember {
    /// First letter of the name, for the avatar placeholder
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next()
    }
}

/// Admin form payload for a faculty member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDraft {
    pub name: String,
    pub designation: String,
    pub department: String,
    pub bio: String,
    pub photo: String,
    pub email: String,
    pub linkedin: String,
    pub specialization: Vec<String>,
    pub experience: String,
    pub education: String,
}

impl From<&FacultyMember> for FacultyDraft {
    fn from(member: &FacultyMember) -> Self {
        Self {
            name: member.name.clone(),
            designation: member.designation.clone(),
            department: member.department.clone(),
            bio: member.bio.clone().unwrap_or_default(),
            photo: member.photo.clone().unwrap_or_default(),
            email: member.email.clone().unwrap_or_default(),
            linkedin: member.linkedin.clone().unwrap_or_default(),
            specialization: member.specialization.clone(),
            experience: member.experience.clone().unwrap_or_default(),
            education: member.education.clone().unwrap_or_default(),
        }
    }
}
