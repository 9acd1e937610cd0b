//! Record types persisted by the stores, plus the transient generation form.
//!
//! Serialized field names keep the original camelCase (`dateCreated`) so that
//! registry payloads written by earlier versions of the app remain readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::TITLE_DATE_FORMAT;

/// A previously generated email kept as a reusable example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEmail {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
}

impl SavedEmail {
    /// Create a saved email; an empty title defaults to a timestamped one.
    pub fn new(content: String, title: String) -> Self {
        let date_created = Utc::now();
        let title = if title.is_empty() {
            format!(
                "Generated Email {}",
                date_created.format(TITLE_DATE_FORMAT)
            )
        } else {
            title
        };
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            date_created,
        }
    }
}

/// A sample of the user's own writing used to bias generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingStyle {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
}

impl WritingStyle {
    pub fn new(content: String, title: String) -> Self {
        let date_created = Utc::now();
        let title = if title.is_empty() {
            format!("Writing Style {}", date_created.format(TITLE_DATE_FORMAT))
        } else {
            title
        };
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            date_created,
        }
    }

    /// Upgrade a record from the legacy plain-string payload. Legacy entries
    /// carried no title or timestamp.
    pub fn from_legacy(content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            content,
            date_created: Utc::now(),
        }
    }
}

/// A free-form draft the user is still working on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
}

impl Draft {
    pub fn new(content: String, title: String) -> Self {
        let date_created = Utc::now();
        let title = if title.is_empty() {
            format!("Draft {}", date_created.format(TITLE_DATE_FORMAT))
        } else {
            title
        };
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            date_created,
        }
    }
}

/// Opportunity the user is reaching out about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunityType {
    Msc,
    Phd,
    Both,
}

impl OpportunityType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Msc => "MSc",
            Self::Phd => "PhD",
            Self::Both => "Both MSc/PhD",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "msc" => Some(Self::Msc),
            "phd" => Some(Self::Phd),
            "both" | "both msc/phd" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Form input for one generation request. All fields are optional; empty
/// fields are omitted from the generated prompt. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct EmailFormData {
    pub professor_name: String,
    pub university_name: String,
    pub department_name: String,
    pub lab_name: String,
    pub research_topic: String,
    pub opportunity_type: String,
    pub project_details: String,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title_gets_timestamped_default() {
        let email = SavedEmail::new("body".to_string(), String::new());
        assert!(email.title.starts_with("Generated Email "));

        let style = WritingStyle::new("sample".to_string(), String::new());
        assert!(style.title.starts_with("Writing Style "));

        let draft = Draft::new("wip".to_string(), String::new());
        assert!(draft.title.starts_with("Draft "));
    }

    #[test]
    fn test_explicit_title_is_kept() {
        let email = SavedEmail::new("body".to_string(), "My email".to_string());
        assert_eq!(email.title, "My email");
    }

    #[test]
    fn test_serde_uses_original_field_names() {
        let draft = Draft::new("content".to_string(), "t".to_string());
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("dateCreated").is_some());
        assert!(json.get("date_created").is_none());
    }

    #[test]
    fn test_legacy_writing_style_has_empty_title() {
        let style = WritingStyle::from_legacy("old sample".to_string());
        assert_eq!(style.title, "");
        assert_eq!(style.content, "old sample");
    }

    #[test]
    fn test_opportunity_type_parse_and_display() {
        assert_eq!(OpportunityType::parse("msc"), Some(OpportunityType::Msc));
        assert_eq!(OpportunityType::parse("PhD"), Some(OpportunityType::Phd));
        assert_eq!(
            OpportunityType::parse("Both MSc/PhD"),
            Some(OpportunityType::Both)
        );
        assert_eq!(OpportunityType::parse("postdoc"), None);
        assert_eq!(OpportunityType::Both.display_name(), "Both MSc/PhD");
    }
}
