//! Slider position labels.

/// Highest age slider position, shown as "10+ Years".
pub const AGE_MAX: u8 = 10;

/// Stories slider domain.
pub const STORIES_MIN: u8 = 1;
pub const STORIES_MAX: u8 = 3;

/// Duration slider labels, indexed by position.
pub const DURATION_LABELS: [&str; 4] = [
    "Just noticed",
    "Less than 1 month",
    "1–6 months",
    "More than 6 months",
];

/// Label for a roof age in years. Out-of-range values are clamped.
pub fn age_label(years: u8) -> String {
    match years.min(AGE_MAX) {
        0 => "Less than 1 Year".to_string(),
        AGE_MAX => "10+ Years".to_string(),
        n => format!("{} Years", n),
    }
}

/// Label for a number of stories. Out-of-range values are clamped.
pub fn stories_label(stories: u8) -> String {
    match stories.clamp(STORIES_MIN, STORIES_MAX) {
        STORIES_MAX => "3+ Stories".to_string(),
        n if n <= 1 => format!("{} Story", n),
        n => format!("{} Stories", n),
    }
}

/// Label for a duration slider position. Out-of-range values are clamped.
pub fn duration_label(index: u8) -> &'static str {
    let last = DURATION_LABELS.len() - 1;
    DURATION_LABELS[usize::from(index).min(last)]
}
