//! Collected wizard answers.

use serde::{Deserialize, Serialize};

use crate::labels::{age_label, duration_label, stories_label};
use crate::step::WizardStep;

/// Shortest zip code accepted on step 1.
pub const MIN_ZIPCODE_LEN: usize = 5;

/// An answer the wizard collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Zipcode,
    Relation,
    Type,
    Age,
    Stories,
    Size,
    Situation,
    Duration,
}

impl Field {
    /// Key used by the page markup (`data-group`, element ids).
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Zipcode => "zipcode",
            Field::Relation => "relation",
            Field::Type => "type",
            Field::Age => "age",
            Field::Stories => "stories",
            Field::Size => "size",
            Field::Situation => "situation",
            Field::Duration => "duration",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Field::Zipcode => "Zip code",
            Field::Relation => "Relation to property",
            Field::Type => "Roof type",
            Field::Age => "Roof age",
            Field::Stories => "Stories",
            Field::Size => "Roof size",
            Field::Situation => "Problem",
            Field::Duration => "Duration",
        }
    }

    /// Fields required to leave `step`.
    pub fn required_for(step: WizardStep) -> &'static [Field] {
        match step {
            WizardStep::Property => &[Field::Zipcode, Field::Relation],
            WizardStep::Roof => &[Field::Type, Field::Age, Field::Stories, Field::Size],
            WizardStep::Situation => &[Field::Situation, Field::Duration],
            WizardStep::Contact => &[],
        }
    }
}

/// Single-select option groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionGroup {
    Relation,
    Type,
    Size,
    Situation,
}

impl SelectionGroup {
    /// All groups.
    pub const ALL: [SelectionGroup; 4] = [
        SelectionGroup::Relation,
        SelectionGroup::Type,
        SelectionGroup::Size,
        SelectionGroup::Situation,
    ];

    /// The field a selection writes.
    pub fn field(&self) -> Field {
        match self {
            SelectionGroup::Relation => Field::Relation,
            SelectionGroup::Type => Field::Type,
            SelectionGroup::Size => Field::Size,
            SelectionGroup::Situation => Field::Situation,
        }
    }

    /// Parse a `data-group` key.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.field().as_str() == key)
    }
}

/// Answers collected so far, plus the current step.
///
/// Slider fields start at their lowest position's label, so they are never
/// empty unless a UI adapter never initialised them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    step: WizardStep,
    zipcode: String,
    relation: String,
    #[serde(rename = "type")]
    roof_type: String,
    age: String,
    stories: String,
    size: String,
    situation: String,
    duration: String,
}

impl WizardState {
    /// Fresh state at step 1 with slider defaults.
    pub fn new() -> Self {
        Self {
            step: WizardStep::Property,
            zipcode: String::new(),
            relation: String::new(),
            roof_type: String::new(),
            age: age_label(0),
            stories: stories_label(1),
            size: String::new(),
            situation: String::new(),
            duration: duration_label(0).to_string(),
        }
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub(crate) fn set_step(&mut self, step: WizardStep) {
        self.step = step;
    }

    /// Current value of a field; empty when unanswered.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Zipcode => &self.zipcode,
            Field::Relation => &self.relation,
            Field::Type => &self.roof_type,
            Field::Age => &self.age,
            Field::Stories => &self.stories,
            Field::Size => &self.size,
            Field::Situation => &self.situation,
            Field::Duration => &self.duration,
        }
    }

    /// Check if a field satisfies its step's requirement.
    ///
    /// The zip code needs at least five characters; everything else only
    /// needs to be non-empty.
    pub fn is_answered(&self, field: Field) -> bool {
        match field {
            Field::Zipcode => self.zipcode.chars().count() >= MIN_ZIPCODE_LEN,
            _ => !self.value(field).is_empty(),
        }
    }

    /// Set the zip code as typed.
    pub fn set_zipcode(&mut self, zipcode: impl Into<String>) {
        self.zipcode = zipcode.into();
    }

    /// Select an option, replacing any earlier selection in the group.
    pub fn select(&mut self, group: SelectionGroup, value: impl Into<String>) {
        let value = value.into();
        match group {
            SelectionGroup::Relation => self.relation = value,
            SelectionGroup::Type => self.roof_type = value,
            SelectionGroup::Size => self.size = value,
            SelectionGroup::Situation => self.situation = value,
        }
    }

    /// Check if `value` is the selected option of `group`.
    pub fn is_selected(&self, group: SelectionGroup, value: &str) -> bool {
        let current = self.value(group.field());
        !current.is_empty() && current == value
    }

    /// Set roof age from the slider (0 to 10).
    pub fn set_age(&mut self, years: u8) {
        self.age = age_label(years);
    }

    /// Set stories from the slider (1 to 3).
    pub fn set_stories(&mut self, stories: u8) {
        self.stories = stories_label(stories);
    }

    /// Set duration from the slider (0 to 3).
    pub fn set_duration(&mut self, index: u8) {
        self.duration = duration_label(index).to_string();
    }

    /// Required fields of `step` that are still empty.
    pub fn missing_for(&self, step: WizardStep) -> Vec<Field> {
        Field::required_for(step)
            .iter()
            .copied()
            .filter(|f| !self.is_answered(*f))
            .collect()
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = WizardState::new();
        assert_eq!(state.step(), WizardStep::Property);
        assert_eq!(state.value(Field::Age), "Less than 1 Year");
        assert_eq!(state.value(Field::Stories), "1 Story");
        assert_eq!(state.value(Field::Duration), "Just noticed");
        assert!(!state.is_answered(Field::Zipcode));
    }

    #[test]
    fn test_zipcode_needs_five_characters() {
        let mut state = WizardState::new();
        state.set_zipcode("1234");
        assert!(!state.is_answered(Field::Zipcode));
        state.set_zipcode("12345");
        assert!(state.is_answered(Field::Zipcode));
    }

    #[test]
    fn test_select_replaces_sibling() {
        let mut state = WizardState::new();
        state.select(SelectionGroup::Type, "shingle");
        state.select(SelectionGroup::Type, "metal");

        assert!(state.is_selected(SelectionGroup::Type, "metal"));
        assert!(!state.is_selected(SelectionGroup::Type, "shingle"));
        assert!(!state.is_selected(SelectionGroup::Size, ""));
    }

    #[test]
    fn test_sliders_write_labels() {
        let mut state = WizardState::new();
        state.set_age(5);
        state.set_stories(2);
        state.set_duration(2);
        assert_eq!(state.value(Field::Age), "5 Years");
        assert_eq!(state.value(Field::Stories), "2 Stories");
        assert_eq!(state.value(Field::Duration), "1–6 months");
    }

    #[test]
    fn test_group_parse() {
        assert_eq!(SelectionGroup::parse("relation"), Some(SelectionGroup::Relation));
        assert_eq!(SelectionGroup::parse("situation"), Some(SelectionGroup::Situation));
        assert_eq!(SelectionGroup::parse("age"), None);
    }

    #[test]
    fn test_missing_for_step() {
        let mut state = WizardState::new();
        assert_eq!(
            state.missing_for(WizardStep::Property),
            vec![Field::Zipcode, Field::Relation]
        );
        assert_eq!(
            state.missing_for(WizardStep::Roof),
            vec![Field::Type, Field::Size]
        );
        state.select(SelectionGroup::Situation, "leak");
        assert!(state.missing_for(WizardStep::Situation).is_empty());
    }
}
