use chrono::{Local, NaiveDate, TimeZone, Timelike, Utc};
use egui::{Color32, Context, RichText, Window};
use rust_todo_app::{Priority, Todo, TodoDraft};
use uuid::Uuid;

use crate::app::TodoApp;
use crate::ui::theme;

/// Form fields of the add/edit todo dialog. Dates are edited in local time.
#[derive(Debug, Clone)]
pub struct TodoEditorState {
    /// `None` when adding a new todo.
    pub todo_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub priority: Priority,
}

impl TodoEditorState {
    pub fn for_new() -> Self {
        Self::from_draft(None, TodoDraft::default())
    }

    pub fn for_todo(todo: &Todo) -> Self {
        Self::from_draft(Some(todo.id()), TodoDraft::from(todo))
    }

    fn from_draft(todo_id: Option<Uuid>, draft: TodoDraft) -> Self {
        let due = draft.due_date.unwrap_or_else(Utc::now).with_timezone(&Local);
        Self {
            todo_id,
            title: draft.title,
            description: draft.description,
            due_date: due.date_naive(),
            hour: due.hour(),
            minute: due.minute(),
            priority: draft.priority,
        }
    }

    pub fn to_draft(&self) -> TodoDraft {
        let due = self
            .due_date
            .and_hms_opt(self.hour.min(23), self.minute.min(59), 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(|local| local.with_timezone(&Utc));
        TodoDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            due_date: due,
            priority: self.priority,
        }
    }
}

/// Render the add/edit todo dialog.
pub fn show_todo_editor(app: &mut TodoApp, ctx: &Context) {
    let Some(state) = app.editor.as_mut() else {
        return;
    };
    let mut submit = false;
    let mut should_close = false;
    let heading = if state.todo_id.is_some() {
        "Edit Todo"
    } else {
        "Add Todo"
    };

    Window::new(RichText::new(heading).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("todo_editor_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    let title = ui.add_sized(
                        [240.0, 24.0],
                        egui::TextEdit::singleline(&mut state.title)
                            .hint_text("Todo title...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    if title.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();

                    ui.label(RichText::new("Description").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [240.0, 60.0],
                        egui::TextEdit::multiline(&mut state.description)
                            .hint_text("Add notes or description..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Due").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut state.due_date)
                                .id_salt("todo_due_date"),
                        );
                        ui.add(
                            egui::DragValue::new(&mut state.hour)
                                .range(0..=23)
                                .custom_formatter(|v, _| format!("{:02}", v as u32)),
                        );
                        ui.label(":");
                        ui.add(
                            egui::DragValue::new(&mut state.minute)
                                .range(0..=59)
                                .custom_formatter(|v, _| format!("{:02}", v as u32)),
                        );
                    });
                    ui.end_row();

                    ui.label(RichText::new("Priority").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        for p in Priority::all() {
                            ui.radio_value(
                                &mut state.priority,
                                *p,
                                RichText::new(p.label()).color(theme::priority_color(*p)),
                            );
                        }
                    });
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let label = if state.todo_id.is_some() { "Save" } else { "Create" };
                let save_btn = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], save_btn).clicked() {
                    submit = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if submit {
        if let Some(state) = app.editor.take() {
            app.submit_todo(state.todo_id, state.to_draft());
        }
    } else if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.editor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_keeps_local_wall_clock_time() {
        let state = TodoEditorState {
            todo_id: None,
            title: "  Buy milk ".to_string(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            hour: 14,
            minute: 30,
            priority: Priority::High,
        };

        let draft = state.to_draft();
        let due = draft.due_date.expect("valid local time").with_timezone(&Local);

        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(due.date_naive(), state.due_date);
        assert_eq!((due.hour(), due.minute()), (14, 30));
    }

    #[test]
    fn new_form_starts_blank_with_normal_priority() {
        let state = TodoEditorState::for_new();

        assert_eq!(state.todo_id, None);
        assert!(state.title.is_empty());
        assert_eq!(state.priority, Priority::Normal);
    }

    #[test]
    fn editing_prefills_from_todo() {
        let todo = Todo::new("t", "d", None, Some(Priority::Low));
        let state = TodoEditorState::for_todo(&todo);

        assert_eq!(state.todo_id, Some(todo.id()));
        assert_eq!(state.title, "t");
        assert_eq!(state.description, "d");
        assert_eq!(state.priority, Priority::Low);
    }
}
