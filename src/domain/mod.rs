pub mod enums;
pub mod goal;
pub mod graph;
pub mod project;
pub mod views;

pub use enums::{BoardStatus, Priority, UiMode, View};
pub use goal::{Goal, GoalDraft, TaskLink};
pub use graph::{TaskDraft, TaskGraph};
pub use project::{Project, ProjectDraft, Task};
pub use views::{
    checkbox, flatten_archive, flatten_board, flatten_goals, flatten_planned, flatten_projects,
    format_clock, format_hours, tree_connector, FlatRow, RowTarget,
};
