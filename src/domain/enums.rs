use serde::{Deserialize, Serialize};

/// Priority of a project (and optionally of a task)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse priority from user input like "high" or "h"
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "med" | "m" => Some(Self::Medium),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Board a project sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardStatus {
    #[default]
    Execution,
    Incubation,
}

impl BoardStatus {
    /// Parse a board name like "incubation" or "i"
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "execution" | "exec" | "e" => Some(Self::Execution),
            "incubation" | "incubate" | "i" => Some(Self::Incubation),
            _ => None,
        }
    }

    /// The other board
    pub fn toggled(&self) -> Self {
        match self {
            Self::Execution => Self::Incubation,
            Self::Incubation => Self::Execution,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Execution => "Execution",
            Self::Incubation => "Incubation",
        }
    }
}

/// Top-level screen of the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Projects,
    Board,
    Focus,
    Goals,
    Archive,
}

impl View {
    /// Next view in the `v` cycle
    pub fn next(&self) -> Self {
        match self {
            Self::Projects => Self::Board,
            Self::Board => Self::Focus,
            Self::Focus => Self::Goals,
            Self::Goals => Self::Archive,
            Self::Archive => Self::Projects,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Projects => "Projects",
            Self::Board => "Board",
            Self::Focus => "Focus",
            Self::Goals => "Goals",
            Self::Archive => "Archive",
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    /// Text input form for a project, task, subtask or goal
    Form,
    /// Daily planner modal
    Planner,
    /// Keybinding help overlay
    Help,
    /// Undo history overlay
    History,
    /// Confirmation before a destructive action
    ConfirmDelete,
}
