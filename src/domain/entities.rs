use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// Account record returned by `/api/me`. The upstream shape is open, so all
// fields are kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl User {
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }
}

// Application settings; no fixed schema upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Setting {
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Setting {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Idle,
    Processing,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectNoteStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTimeEntry {
    pub id: u64,
    pub project_id: u64,
    pub user_id: u64,
    pub seconds_counted: u64,
    // Sent as 0/1 by the API.
    #[serde(deserialize_with = "flag")]
    pub is_counting: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectNote {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub note: String,
    pub status: ProjectNoteStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub status: ProjectStatus,
    pub user_id: u64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub time_entries: Vec<ProjectTimeEntry>,
    #[serde(default)]
    pub notes: Vec<ProjectNote>,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}
