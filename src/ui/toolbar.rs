use crate::app::TodoApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TodoApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Export Backup...").clicked() {
                app.export_backup();
                ui.close_menu();
            }
            if ui.button("  Import Backup...").clicked() {
                app.import_backup();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export Project CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Open Data Folder").clicked() {
                app.open_data_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Project  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Project    Ctrl+Shift+P").clicked() {
                app.open_new_project_prompt();
                ui.close_menu();
            }
            let has_current = app.session.current_project().is_some();
            if ui
                .add_enabled(has_current, egui::Button::new("  Rename..."))
                .clicked()
            {
                app.open_rename_prompt();
                ui.close_menu();
            }
            let can_delete = has_current && app.session.manager().len() > 1;
            if ui
                .add_enabled(can_delete, egui::Button::new("  Delete"))
                .clicked()
            {
                app.request_delete_current_project();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(has_current, egui::Button::new("  Add Todo       Ctrl+N"))
                .clicked()
            {
                app.open_add_todo();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned current project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = app
                .session
                .current_project()
                .map(|p| p.name().to_string())
                .unwrap_or_else(|| "No project selected".to_string());
            ui.label(RichText::new(label).size(11.0).weak());
        });
    });
}
