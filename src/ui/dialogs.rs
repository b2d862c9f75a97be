use crate::app::{PendingDelete, TodoApp};
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

fn dialog(title: &str) -> Window<'static> {
    Window::new(RichText::new(title.to_string()).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
}

/// Message for the delete confirmation. Project deletion mentions how many
/// todos go with it.
pub fn delete_message(app: &TodoApp, pending: PendingDelete) -> String {
    match pending {
        PendingDelete::Project(id) => match app.session.manager().project(id) {
            Some(project) => {
                let count = project.todos().len();
                if count > 0 {
                    format!(
                        "Are you sure you want to delete \"{}\"? This will also delete {} todo{} in this project.",
                        project.name(),
                        count,
                        if count == 1 { "" } else { "s" }
                    )
                } else {
                    format!("Are you sure you want to delete \"{}\"?", project.name())
                }
            }
            None => "This project no longer exists.".to_string(),
        },
        PendingDelete::Todo(_) => "Are you sure you want to delete this todo?".to_string(),
    }
}

/// Render the new/rename project prompt.
pub fn show_project_prompt(app: &mut TodoApp, ctx: &Context) {
    let Some(prompt) = app.project_prompt.as_mut() else {
        return;
    };
    let mut submit = false;
    let mut should_close = false;
    let title = if prompt.project_id.is_some() {
        "Rename Project"
    } else {
        "New Project"
    };

    dialog(title).show(ctx, |ui| {
        ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
        ui.add_space(4.0);
        ui.label(RichText::new("Enter project name:").color(theme::TEXT_SECONDARY));
        let edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut prompt.name).hint_text("Project name..."),
        );
        if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let ok = egui::Button::new(RichText::new("OK").color(Color32::WHITE))
                .fill(theme::ACCENT)
                .rounding(egui::Rounding::same(4.0));
            if ui.add_sized([80.0, 28.0], ok).clicked() {
                submit = true;
            }
            if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                should_close = true;
            }
        });
    });

    if submit {
        if let Some(prompt) = app.project_prompt.take() {
            app.submit_project_prompt(prompt);
        }
    } else if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.project_prompt = None;
    }
}

/// Render the delete confirmation for a project or todo.
pub fn show_confirm_delete(app: &mut TodoApp, ctx: &Context) {
    let Some(pending) = app.pending_delete else {
        return;
    };
    let message = delete_message(app, pending);
    let mut confirmed = false;
    let mut should_close = false;

    dialog("Confirm Delete").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.label(message);
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                .fill(theme::DANGER)
                .rounding(egui::Rounding::same(4.0));
            if ui.add_sized([80.0, 28.0], delete).clicked() {
                confirmed = true;
            }
            if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                should_close = true;
            }
        });
    });

    if confirmed {
        app.pending_delete = None;
        app.confirm_delete(pending);
    } else if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.pending_delete = None;
    }
}

/// Render a one-button notice.
pub fn show_notice(app: &mut TodoApp, ctx: &Context) {
    let Some(message) = app.notice.clone() else {
        return;
    };
    let mut should_close = false;

    dialog("Notice").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.label(message);
        ui.add_space(8.0);
        if ui.add_sized([80.0, 28.0], egui::Button::new("OK")).clicked() {
            should_close = true;
        }
    });

    if should_close
        || ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter))
    {
        app.notice = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TodoApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Rust Todo App").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Projects and todos, saved locally.");
                if let Some((level, dir)) = rust_todo_app::logging::logging_status() {
                    ui.label(
                        RichText::new(format!("Logging {} to {}", level, dir.display()))
                            .size(10.0)
                            .color(theme::TEXT_DIM),
                    );
                }
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
