use chrono::{DateTime, Local, Utc};
use egui::{Color32, RichText, Ui};
use rust_todo_app::{Project, Todo};
use uuid::Uuid;

use crate::ui::theme;

/// Actions that the todo list can request.
pub enum TodoListAction {
    None,
    Add,
    Toggle(Uuid),
    Edit(Uuid),
    Delete(Uuid),
}

/// "Jun 15, 2025 14:30" in local time.
pub fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string()
}

fn empty_state(ui: &mut Ui, heading: &str, hint: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.label(RichText::new(heading).size(16.0).strong().color(theme::TEXT_SECONDARY));
        ui.add_space(4.0);
        ui.label(RichText::new(hint).size(12.0).color(theme::TEXT_DIM));
    });
}

/// Render the current project's todos.
pub fn show_todo_list(project: Option<&Project>, ui: &mut Ui) -> TodoListAction {
    let mut action = TodoListAction::None;

    let Some(project) = project else {
        empty_state(
            ui,
            "No Project Selected",
            "Please select a project from the sidebar to view its todos.",
        );
        return action;
    };

    // Header
    ui.horizontal(|ui| {
        ui.label(RichText::new(project.name()).size(20.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let btn = egui::Button::new(
                RichText::new(format!("{}  Add Todo", egui_phosphor::regular::PLUS))
                    .color(Color32::WHITE)
                    .size(12.0),
            )
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(5.0));
            if ui.add_sized([110.0, 28.0], btn).clicked() {
                action = TodoListAction::Add;
            }
        });
    });
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(6.0);

    if project.todos().is_empty() {
        empty_state(
            ui,
            "No Todos Yet",
            "Click \"Add Todo\" to create your first task in this project.",
        );
        return action;
    }

    let now = Utc::now();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for todo in project.todos() {
                if let Some(a) = show_todo_item(todo, now, ui) {
                    action = a;
                }
                ui.add_space(6.0);
            }
        });

    action
}

fn show_todo_item(todo: &Todo, now: DateTime<Utc>, ui: &mut Ui) -> Option<TodoListAction> {
    let mut action = None;
    let priority_color = theme::priority_color(todo.priority());

    let frame = egui::Frame {
        fill: theme::BG_CARD,
        rounding: egui::Rounding::same(theme::CARD_ROUNDING),
        inner_margin: egui::Margin::symmetric(12.0, 8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui| {
            let mut title = RichText::new(todo.title()).font(theme::font_title()).strong();
            if todo.completed {
                title = title.strikethrough().color(theme::TEXT_DIM);
            }
            ui.add(egui::Label::new(title).truncate());

            ui.label(
                RichText::new(format!(
                    "{} {}",
                    theme::priority_icon(todo.priority()),
                    todo.priority().label()
                ))
                .size(10.5)
                .color(priority_color),
            );
        });

        if !todo.description().is_empty() {
            ui.add_space(2.0);
            ui.label(
                RichText::new(todo.description())
                    .size(11.5)
                    .color(theme::TEXT_SECONDARY),
            );
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let due_color = if todo.is_overdue(now) {
                theme::OVERDUE
            } else {
                theme::TEXT_DIM
            };
            ui.label(
                RichText::new(format!(
                    "{} Due: {}",
                    egui_phosphor::regular::CALENDAR_BLANK,
                    format_due(todo.due_date())
                ))
                .size(10.5)
                .color(due_color),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let delete = egui::Button::new(
                    RichText::new(format!("{} Delete", egui_phosphor::regular::TRASH))
                        .size(11.0)
                        .color(theme::DANGER),
                );
                if ui.add(delete).clicked() {
                    action = Some(TodoListAction::Delete(todo.id()));
                }

                let edit = egui::Button::new(
                    RichText::new(format!("{} Edit", egui_phosphor::regular::PENCIL_SIMPLE))
                        .size(11.0),
                );
                if ui.add(edit).clicked() {
                    action = Some(TodoListAction::Edit(todo.id()));
                }

                let (icon, label, color) = if todo.completed {
                    (egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE, "Undo", theme::TEXT_SECONDARY)
                } else {
                    (egui_phosphor::regular::CHECK, "Complete", theme::SUCCESS)
                };
                let toggle = egui::Button::new(
                    RichText::new(format!("{icon} {label}")).size(11.0).color(color),
                );
                if ui.add(toggle).clicked() {
                    action = Some(TodoListAction::Toggle(todo.id()));
                }
            });
        });
    });

    action
}
