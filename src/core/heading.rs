//! Heading level → display class table.

/// Maps a heading level label (`"1"`..`"6"`) to its display class.
#[derive(Debug, Clone)]
pub struct HeadingLevels {
    classes: [&'static str; 6],
}

impl Default for HeadingLevels {
    fn default() -> Self {
        Self {
            classes: [
                "display-1",
                "display-2",
                "display-3",
                "display-4",
                "display-5",
                "display-6",
            ],
        }
    }
}

impl HeadingLevels {
    /// Class for a label, matched as the exact decimal string `1`..`6`.
    ///
    /// `"03"`, `" 3"` and `"7"` have no class.
    pub fn class_for(&self, label: &str) -> Option<&'static str> {
        let level = match label {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            "5" => 5,
            "6" => 6,
            _ => return None,
        };
        Some(self.classes[level - 1])
    }
}
