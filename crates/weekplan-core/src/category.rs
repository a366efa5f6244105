//! Categories painted onto the availability grid.
//!
//! A category's effect on scheduling is decided by its *purposes*. Purposes
//! are either tagged explicitly or derived from the category name by
//! case-insensitive substring matching against configurable label tokens,
//! so a renamed "Homework (maths)" keeps matching home tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Identifier of a category, stable for the session.
pub type CategoryId = String;

/// What kind of slot a category offers, or what kind of slot a task needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Home,
    Placement,
    School,
    Other,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Home => "home",
            Context::Placement => "placement",
            Context::School => "school",
            Context::Other => "other",
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::Other
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" | "huiswerk" => Ok(Context::Home),
            "placement" | "stage" => Ok(Context::Placement),
            "school" => Ok(Context::School),
            "other" => Ok(Context::Other),
            other => Err(ValidationError::value(
                "context",
                format!("expected home, placement, school or other, got '{other}'"),
            )),
        }
    }
}

/// Scheduling role of a category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Reserved time; never eligible for any task.
    Sleep,
    /// Home-task slots (homework, housework).
    Home,
    /// Work-placement slots.
    Placement,
    /// School or lesson slots.
    School,
    /// Generic free time.
    Free,
}

impl FromStr for Purpose {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sleep" => Ok(Purpose::Sleep),
            "home" => Ok(Purpose::Home),
            "placement" => Ok(Purpose::Placement),
            "school" => Ok(Purpose::School),
            "free" => Ok(Purpose::Free),
            other => Err(ValidationError::value(
                "purpose",
                format!("expected sleep, home, placement, school or free, got '{other}'"),
            )),
        }
    }
}

/// Effective purposes of one category. Several may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Purposes {
    pub sleep: bool,
    pub home: bool,
    pub placement: bool,
    pub school: bool,
    pub free: bool,
}

impl Purposes {
    fn insert(&mut self, purpose: Purpose) {
        match purpose {
            Purpose::Sleep => self.sleep = true,
            Purpose::Home => self.home = true,
            Purpose::Placement => self.placement = true,
            Purpose::School => self.school = true,
            Purpose::Free => self.free = true,
        }
    }
}

impl FromIterator<Purpose> for Purposes {
    fn from_iter<I: IntoIterator<Item = Purpose>>(iter: I) -> Self {
        let mut purposes = Purposes::default();
        for p in iter {
            purposes.insert(p);
        }
        purposes
    }
}

/// A named, colored tag painted onto grid cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Display only.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub context: Context,
    /// Explicit purpose tags. Empty means "derive from the name".
    #[serde(default)]
    pub purposes: Vec<Purpose>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, context: Context) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            context,
            purposes: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_purposes(mut self, purposes: impl IntoIterator<Item = Purpose>) -> Self {
        self.purposes = purposes.into_iter().collect();
        self
    }
}

/// Label tokens used to derive purposes from category names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelRules {
    #[serde(default = "default_sleep_tokens")]
    pub sleep: Vec<String>,
    #[serde(default = "default_home_tokens")]
    pub home: Vec<String>,
    #[serde(default = "default_placement_tokens")]
    pub placement: Vec<String>,
    #[serde(default = "default_school_tokens")]
    pub school: Vec<String>,
    #[serde(default = "default_free_tokens")]
    pub free: Vec<String>,
}

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
fn default_sleep_tokens() -> Vec<String> {
    tokens(&["sleep", "slaap"])
}
fn default_home_tokens() -> Vec<String> {
    tokens(&["homework", "housework", "huiswerk"])
}
fn default_placement_tokens() -> Vec<String> {
    tokens(&["placement", "stage"])
}
fn default_school_tokens() -> Vec<String> {
    tokens(&["school", "lesson"])
}
fn default_free_tokens() -> Vec<String> {
    tokens(&["free", "vrij"])
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            sleep: default_sleep_tokens(),
            home: default_home_tokens(),
            placement: default_placement_tokens(),
            school: default_school_tokens(),
            free: default_free_tokens(),
        }
    }
}

impl LabelRules {
    /// Effective purposes of `category`: explicit tags win over the name.
    pub fn classify(&self, category: &Category) -> Purposes {
        if !category.purposes.is_empty() {
            return category.purposes.iter().copied().collect();
        }

        let name = category.name.to_lowercase();
        let matches = |list: &[String]| {
            list.iter()
                .any(|token| !token.is_empty() && name.contains(&token.to_lowercase()))
        };

        Purposes {
            sleep: matches(&self.sleep),
            home: matches(&self.home),
            placement: matches(&self.placement),
            school: matches(&self.school),
            free: matches(&self.free),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_insensitive_substring() {
        let rules = LabelRules::default();
        let cat = Category::new("c1", "Maths HOMEWORK block", Context::Home);
        let p = rules.classify(&cat);
        assert!(p.home);
        assert!(!p.sleep);
        assert!(!p.free);
    }

    #[test]
    fn classify_matches_dutch_labels() {
        let rules = LabelRules::default();
        assert!(rules.classify(&Category::new("a", "Slaap", Context::Other)).sleep);
        assert!(rules.classify(&Category::new("b", "Stage bij bakker", Context::Placement)).placement);
        assert!(rules.classify(&Category::new("c", "Vrije tijd", Context::Other)).free);
    }

    #[test]
    fn name_can_carry_several_purposes() {
        let rules = LabelRules::default();
        let p = rules.classify(&Category::new("c", "free homework", Context::Home));
        assert!(p.home);
        assert!(p.free);
    }

    #[test]
    fn explicit_purposes_override_name() {
        let rules = LabelRules::default();
        let cat = Category::new("c", "Nap", Context::Other).with_purposes([Purpose::Sleep]);
        let p = rules.classify(&cat);
        assert!(p.sleep);
        assert!(!p.free);
    }

    #[test]
    fn lesson_token_counts_as_school() {
        let rules = LabelRules::default();
        assert!(rules.classify(&Category::new("c", "Piano lesson", Context::School)).school);
    }

    #[test]
    fn context_parses_original_task_types() {
        assert_eq!("huiswerk".parse::<Context>().unwrap(), Context::Home);
        assert_eq!("stage".parse::<Context>().unwrap(), Context::Placement);
        assert_eq!(" School ".parse::<Context>().unwrap(), Context::School);
        assert!("work".parse::<Context>().is_err());
    }
}
