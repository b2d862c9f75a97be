use egui::{Color32, RichText, Ui};
use rust_todo_app::ProjectManager;
use uuid::Uuid;

use crate::ui::theme;

/// Actions that the project list can request.
pub enum ProjectListAction {
    None,
    Select(Uuid),
    Delete(Uuid),
    Add,
}

/// Render the left-side project list.
pub fn show_project_list(manager: &ProjectManager, ui: &mut Ui) -> ProjectListAction {
    let mut action = ProjectListAction::None;
    let current = manager.current_id();
    // The last project can't be deleted.
    let deletable = manager.len() > 1;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Projects")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", manager.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height((ui.available_height() - 44.0).max(60.0))
        .show(ui, |ui| {
            for project in manager.projects() {
                let is_selected = current == Some(project.id());
                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else {
                    theme::BG_PANEL
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 5.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;
                        let name_text = RichText::new(project.name()).size(12.5).color(
                            if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            },
                        );
                        ui.add(egui::Label::new(name_text).truncate());

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if deletable {
                                    let del_btn = ui.add(
                                        egui::Button::new(
                                            RichText::new(egui_phosphor::regular::X)
                                                .size(10.0)
                                                .color(theme::TEXT_DIM),
                                        )
                                        .frame(false),
                                    );
                                    if del_btn.on_hover_text("Delete project").clicked() {
                                        action = ProjectListAction::Delete(project.id());
                                    }
                                }
                                ui.label(
                                    RichText::new(format!(
                                        "{}/{}",
                                        project.completed_count(),
                                        project.todos().len()
                                    ))
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                                );
                            },
                        );
                    });
                });

                // Make entire row clickable
                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("project-row", project.id())),
                    egui::Sense::click(),
                );
                if row_click.clicked() && !matches!(action, ProjectListAction::Delete(_)) {
                    action = ProjectListAction::Select(project.id());
                }

                ui.add_space(1.0);
            }
        });

    ui.add_space(6.0);
    let btn = egui::Button::new(
        RichText::new(format!("{}  New Project", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = ProjectListAction::Add;
    }

    action
}
