/// Settings for one patch run.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchConfig {
    /// Family used to synthesize the fallback font.
    pub fallback_family: String,
    pub fallback_size_pt: u16,
    /// Resource table position the fallback font is inserted at.
    pub fallback_position: usize,
    /// Scale heights of translated runs by the text length ratio.
    /// Best effort only: it tends to under- or overshoot for proportional fonts.
    pub rescale_heights: bool,
}

impl Default for PatchConfig {
    fn default() -> Self {
        PatchConfig {
            fallback_family: "Arial".to_string(),
            fallback_size_pt: 18,
            fallback_position: 0,
            rescale_heights: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranslateConfig {
    /// `None` lets the provider detect the source language.
    pub source_lang: Option<String>,
    pub target_lang: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        TranslateConfig {
            source_lang: None,
            target_lang: "en-US".to_string(),
        }
    }
}
