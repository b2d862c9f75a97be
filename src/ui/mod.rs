pub mod dialogs;
pub mod project_list;
pub mod theme;
pub mod todo_editor;
pub mod todo_list;
pub mod toolbar;
