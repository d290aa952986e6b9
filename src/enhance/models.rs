// src/enhance/models.rs

use serde::Serialize;
use serde_json::Value;

/// Which résumé sections the caller wants rewritten
#[derive(Debug, Clone, Copy, Default)]
pub struct EnhanceOptions {
    pub summary: bool,
    pub experience: bool,
    pub skills: bool,
}

/// Sections recovered from the model's JSON reply.
///
/// The reply is only required to be well-formed JSON; any key that is missing
/// or carries the wrong shape is simply treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnhancedSections {
    pub summary: Option<String>,
    pub experience: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
}

impl EnhancedSections {
    pub fn from_value(value: &Value) -> Self {
        Self {
            summary: value
                .get("summary")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            experience: string_list(value.get("experience")),
            skills: string_list(value.get("skills")),
        }
    }

    /// Keep only the sections the caller asked for. The model may answer with
    /// fields it was never asked about; those never reach the preview or the
    /// overlay.
    pub fn requested(self, opts: &EnhanceOptions) -> Self {
        Self {
            summary: if opts.summary { self.summary } else { None },
            experience: if opts.experience { self.experience } else { None },
            skills: if opts.skills { self.skills } else { None },
        }
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// JSON echo of the rewritten sections, always present with empty defaults
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Preview {
    pub summary: String,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
}

impl From<&EnhancedSections> for Preview {
    fn from(sections: &EnhancedSections) -> Self {
        Self {
            summary: sections.summary.clone().unwrap_or_default(),
            experience: sections.experience.clone().unwrap_or_default(),
            skills: sections.skills.clone().unwrap_or_default(),
        }
    }
}

/// Success body for POST /generate
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub pdf: String,
    pub preview: Preview,
}
