//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A leadership record as stored in the association's `leaders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Source record id (numeric ids are stringified on load)
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name; `null` or absent reads as empty so one incomplete row
    /// doesn't reject the whole list
    #[serde(default, deserialize_with = "deserialize_name")]
    pub name: String,
    /// Free-text job title, e.g. "Vice President of Finance"
    #[serde(default)]
    pub position: Option<String>,
    /// Free-text department; empty or absent acts as a wildcard during assembly
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

impl Leader {
    /// Minimal record with only the fields the layout looks at.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Option<&str>,
        department: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.map(str::to_string),
            department: department.map(str::to_string),
            image_url: None,
            email: None,
            phone: None,
            linkedin_url: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Department with surrounding whitespace removed, `None` when blank.
    pub fn department_key(&self) -> Option<&str> {
        non_blank(self.department.as_deref())
    }

    pub fn position_label(&self) -> Option<&str> {
        non_blank(self.position.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Uint(u64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rank of a leader in the chart; 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    Board = 0,
    Director = 1,
    Manager = 2,
    Member = 3,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Board, Tier::Director, Tier::Manager, Tier::Member];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Tier::Board),
            1 => Some(Tier::Director),
            2 => Some(Tier::Manager),
            3 => Some(Tier::Member),
            _ => None,
        }
    }

    /// The tier directly above this one, `None` for the top tier.
    pub fn parent_tier(self) -> Option<Self> {
        self.as_u8().checked_sub(1).and_then(Self::from_u8)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Board => "board",
            Tier::Director => "director",
            Tier::Manager => "manager",
            Tier::Member => "member",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.as_u8()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::from_u8(value).ok_or_else(|| format!("tier out of range: {value}"))
    }
}

/// Owned view of one chart node and its subtree.
///
/// Rebuilt from the arena on every assembly; carries no identity beyond
/// the leader's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub leader: Leader,
    pub tier: Tier,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, including self.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::size).sum::<usize>()
    }
}
