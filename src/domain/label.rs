//! The fixed set of answer labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::QuizError;

/// A white blood cell type, one per answer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellLabel {
    Neutrophil,
    Lymphocyte,
    Monocyte,
    Eosinophil,
    Basophil,
}

impl CellLabel {
    /// All labels, in the order the answer controls are laid out.
    pub const ALL: [CellLabel; 5] = [
        CellLabel::Neutrophil,
        CellLabel::Lymphocyte,
        CellLabel::Monocyte,
        CellLabel::Eosinophil,
        CellLabel::Basophil,
    ];

    /// Name shown on the answer control.
    pub fn display_name(self) -> &'static str {
        match self {
            CellLabel::Neutrophil => "Neutrófilo",
            CellLabel::Lymphocyte => "Linfócito",
            CellLabel::Monocyte => "Monócito",
            CellLabel::Eosinophil => "Eosinófilo",
            CellLabel::Basophil => "Basófilo",
        }
    }

    /// Hint describing the archetypal nucleus of this cell type. Used when a
    /// synthetic slide replaces the intended one.
    pub fn archetype_hint(self) -> &'static str {
        match self {
            CellLabel::Neutrophil => "Observe os múltiplos lobos (3 a 5) conectados.",
            CellLabel::Lymphocyte => "Núcleo grande, redondo e escuro. Pouco citoplasma.",
            CellLabel::Monocyte => "Núcleo em forma de rim (dobrado), cromatina frouxa.",
            CellLabel::Eosinophil => "Núcleo bilobado e granulação grossa na visão de Textura.",
            CellLabel::Basophil => "Grânulos escuros e densos cobrindo o núcleo.",
        }
    }

    /// Zero-based position of the label among the answer controls.
    pub fn index(self) -> usize {
        match self {
            CellLabel::Neutrophil => 0,
            CellLabel::Lymphocyte => 1,
            CellLabel::Monocyte => 2,
            CellLabel::Eosinophil => 3,
            CellLabel::Basophil => 4,
        }
    }
}

impl fmt::Display for CellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lowercases and strips the accents that occur in the label names.
fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ó' | 'ò' | 'ô' | 'õ' => 'o',
            'í' | 'ì' => 'i',
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            other => other,
        })
        .collect()
}

impl FromStr for CellLabel {
    type Err = QuizError;

    /// Parses either the Portuguese display name (accents optional) or the
    /// English name, case-insensitively.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match normalize(name).as_str() {
            "neutrofilo" | "neutrophil" => Ok(CellLabel::Neutrophil),
            "linfocito" | "lymphocyte" => Ok(CellLabel::Lymphocyte),
            "monocito" | "monocyte" => Ok(CellLabel::Monocyte),
            "eosinofilo" | "eosinophil" => Ok(CellLabel::Eosinophil),
            "basofilo" | "basophil" => Ok(CellLabel::Basophil),
            _ => Err(QuizError::invalid_input(format!(
                "unknown cell label '{name}'"
            ))),
        }
    }
}
