use serde::Serialize;
use std::fmt;

/// Label shown for detected locales outside the catalog
pub const UNSUPPORTED_LANGUAGE_LABEL: &str = "language not yet supported.";

/// One entry of the target-language picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub key: u8,
    pub code: &'static str,
    pub display_name: &'static str,
}

pub const LANGUAGE_CATALOG: [LanguageOption; 5] = [
    LanguageOption { key: 1, code: "zh-CN", display_name: "Chinese" },
    LanguageOption { key: 2, code: "ko", display_name: "Korean" },
    LanguageOption { key: 3, code: "ja", display_name: "Japanese" },
    LanguageOption { key: 4, code: "en", display_name: "English" },
    LanguageOption { key: 5, code: "de", display_name: "German" },
];

pub fn catalog() -> &'static [LanguageOption] {
    &LANGUAGE_CATALOG
}

pub fn find_option(code: &str) -> Option<&'static LanguageOption> {
    LANGUAGE_CATALOG.iter().find(|option| option.code == code)
}

pub fn is_supported(code: &str) -> bool {
    find_option(code).is_some()
}

/// Display name for a detected locale
pub fn find_language(locale: Option<&str>) -> &'static str {
    locale
        .and_then(find_option)
        .map(|option| option.display_name)
        .unwrap_or(UNSUPPORTED_LANGUAGE_LABEL)
}

/// Picker value: the "Please select..." sentinel or a language code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSelection {
    Unselected,
    Code(String),
}

impl LanguageSelection {
    /// `""`, `"0"` and `"unselected"` all mean nothing was picked
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "0" | "unselected" => LanguageSelection::Unselected,
            code => LanguageSelection::Code(code.to_string()),
        }
    }
}

impl fmt::Display for LanguageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageSelection::Unselected => write!(f, "unselected"),
            LanguageSelection::Code(code) => write!(f, "{}", code),
        }
    }
}
