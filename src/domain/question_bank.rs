//! The static question table and item selection.

use rand::Rng;
use rand::seq::SliceRandom;

use super::CellLabel;

/// One static question: where the slide lives, what it shows, and a hint
/// shown after a wrong answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    /// Absolute URL or a file key resolved by the image source.
    pub image_reference: String,
    pub correct_label: CellLabel,
    pub hint: String,
}

impl QuizItem {
    pub fn new(
        image_reference: impl Into<String>,
        correct_label: CellLabel,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            image_reference: image_reference.into(),
            correct_label,
            hint: hint.into(),
        }
    }

    /// Copy of this item whose answer is `label`, with the archetype hint of
    /// that label. The reference is kept so logs still name the slide that
    /// failed.
    pub fn relabeled(&self, label: CellLabel) -> Self {
        if label == self.correct_label {
            return self.clone();
        }
        Self {
            image_reference: self.image_reference.clone(),
            correct_label: label,
            hint: label.archetype_hint().to_string(),
        }
    }
}

struct BankEntry {
    file: &'static str,
    label: CellLabel,
    hint: &'static str,
}

/// Slides from the BCCD dataset that are known to load.
const BCCD_BASE_URL: &str =
    "https://raw.githubusercontent.com/Shenggan/BCCD_Dataset/master/BCCD/JPEGImages";

const BANK: [BankEntry; 5] = [
    BankEntry {
        file: "BloodImage_00002.jpg",
        label: CellLabel::Neutrophil,
        hint: "Observe os múltiplos lobos (3 a 5) conectados.",
    },
    BankEntry {
        file: "BloodImage_00006.jpg",
        label: CellLabel::Eosinophil,
        hint: "Olhe a granulação grossa e brilhante na visão de Textura.",
    },
    BankEntry {
        file: "BloodImage_00022.jpg",
        label: CellLabel::Lymphocyte,
        hint: "Núcleo grande, redondo e escuro. Pouco citoplasma.",
    },
    BankEntry {
        file: "BloodImage_00012.jpg",
        label: CellLabel::Monocyte,
        hint: "Núcleo irregular (dobrado), cromatina mais frouxa que o linfócito.",
    },
    BankEntry {
        file: "BloodImage_00109.jpg",
        label: CellLabel::Neutrophil,
        hint: "Segmentação nuclear clara.",
    },
];

/// Returns the built-in question table.
pub fn question_bank() -> Vec<QuizItem> {
    BANK.iter()
        .map(|entry| {
            QuizItem::new(
                format!("{BCCD_BASE_URL}/{}", entry.file),
                entry.label,
                entry.hint,
            )
        })
        .collect()
}

/// Picks an item uniformly at random. Draws are independent, so the same
/// item may come up twice in a row. Returns `None` for an empty table.
pub fn pick_item<'a, R: Rng + ?Sized>(rng: &mut R, table: &'a [QuizItem]) -> Option<&'a QuizItem> {
    table.choose(rng)
}

/// Index of `item` in `table`, if present.
pub fn position_of(table: &[QuizItem], item: &QuizItem) -> Option<usize> {
    table.iter().position(|candidate| candidate == item)
}

/// Indices visited when retrying from `start`: `start, start + 1, ...`
/// wrapping around the table, at most `attempts` of them.
pub fn cycle_from(start: usize, len: usize, attempts: usize) -> impl Iterator<Item = usize> {
    let count = if len == 0 { 0 } else { attempts };
    (0..count).map(move |offset| (start + offset) % len)
}
