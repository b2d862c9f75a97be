use std::path::PathBuf;

use rust_todo_app::{Session, SessionError, TodoDraft};
use uuid::Uuid;

use crate::ui;
use crate::ui::todo_editor::TodoEditorState;

/// Something waiting for the user to confirm deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Project(Uuid),
    Todo(Uuid),
}

/// Name prompt for creating or renaming a project.
#[derive(Debug, Clone)]
pub struct ProjectPrompt {
    /// `None` creates a new project.
    pub project_id: Option<Uuid>,
    pub name: String,
}

/// Main application state.
pub struct TodoApp {
    pub session: Session,
    pub data_dir: Option<PathBuf>,

    // Dialog state
    pub editor: Option<TodoEditorState>,
    pub project_prompt: Option<ProjectPrompt>,
    pub pending_delete: Option<PendingDelete>,
    pub notice: Option<String>,
    pub show_about: bool,

    // Status message
    pub status_message: String,
}

impl TodoApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: Session, data_dir: Option<PathBuf>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        Self {
            session,
            data_dir,
            editor: None,
            project_prompt: None,
            pending_delete: None,
            notice: None,
            show_about: false,
            status_message: "Ready".to_string(),
        }
    }

    /// Route a failed operation to the status bar, or a notice for the
    /// errors the user has to act on.
    fn report(&mut self, err: SessionError) {
        log::warn!("event=ui_action module=app status=error error={err}");
        match err {
            SessionError::NoProjectSelected => self.notice = Some(err.to_string()),
            other => self.status_message = format!("Error: {other}"),
        }
    }

    // --- Project operations ---

    pub fn open_new_project_prompt(&mut self) {
        self.project_prompt = Some(ProjectPrompt {
            project_id: None,
            name: String::new(),
        });
    }

    pub fn open_rename_prompt(&mut self) {
        if let Some(project) = self.session.current_project() {
            self.project_prompt = Some(ProjectPrompt {
                project_id: Some(project.id()),
                name: project.name().to_string(),
            });
        }
    }

    pub fn submit_project_prompt(&mut self, prompt: ProjectPrompt) {
        let result = match prompt.project_id {
            None => self.session.create_project(&prompt.name).map(|created| {
                if created.is_some() {
                    format!("Project '{}' created", prompt.name.trim())
                } else {
                    "Project name cannot be empty".to_string()
                }
            }),
            Some(id) => self
                .session
                .rename_project(id, &prompt.name)
                .map(|_| "Project renamed".to_string()),
        };
        match result {
            Ok(msg) => self.status_message = msg,
            Err(e) => self.report(e),
        }
    }

    pub fn select_project(&mut self, id: Uuid) {
        if let Err(e) = self.session.select_project(id) {
            self.report(e);
        }
    }

    pub fn request_delete_current_project(&mut self) {
        if self.session.manager().len() <= 1 {
            self.status_message = "The last project cannot be deleted".to_string();
            return;
        }
        if let Some(id) = self.session.manager().current_id() {
            self.pending_delete = Some(PendingDelete::Project(id));
        }
    }

    pub fn confirm_delete(&mut self, pending: PendingDelete) {
        let result = match pending {
            PendingDelete::Project(id) => self.session.delete_project(id).map(|removed| {
                removed
                    .map(|p| format!("Deleted project '{}'", p.name()))
                    .unwrap_or_default()
            }),
            PendingDelete::Todo(id) => self.session.delete_todo(id).map(|removed| {
                removed
                    .map(|t| format!("Deleted '{}'", t.title()))
                    .unwrap_or_default()
            }),
        };
        match result {
            Ok(msg) if !msg.is_empty() => self.status_message = msg,
            Ok(_) => {}
            Err(e) => self.report(e),
        }
    }

    // --- Todo operations ---

    pub fn open_add_todo(&mut self) {
        if self.session.current_project().is_none() {
            self.notice = Some(SessionError::NoProjectSelected.to_string());
            return;
        }
        self.editor = Some(TodoEditorState::for_new());
    }

    pub fn open_edit_todo(&mut self, id: Uuid) {
        if let Some(todo) = self.session.current_project().and_then(|p| p.todo(id)) {
            self.editor = Some(TodoEditorState::for_todo(todo));
        }
    }

    pub fn submit_todo(&mut self, todo_id: Option<Uuid>, draft: TodoDraft) {
        let title = draft.title.clone();
        let result = match todo_id {
            None => self
                .session
                .add_todo(draft)
                .map(|_| format!("Added '{}'", title)),
            Some(id) => self
                .session
                .update_todo(id, draft)
                .map(|_| format!("Updated '{}'", title)),
        };
        match result {
            Ok(msg) => self.status_message = msg,
            Err(e) => self.report(e),
        }
    }

    pub fn toggle_todo(&mut self, id: Uuid) {
        match self.session.toggle_todo(id) {
            Ok(Some(true)) => self.status_message = "Marked complete".to_string(),
            Ok(Some(false)) => self.status_message = "Marked open".to_string(),
            Ok(None) => {}
            Err(e) => self.report(e),
        }
    }

    // --- File operations ---

    pub fn export_backup(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Todo Backup", &["json"])
            .set_file_name("todo-backup.json")
            .save_file()
        {
            match self.session.export_backup(&path) {
                Ok(count) => self.status_message = format!("Exported {} projects", count),
                Err(e) => self.report(e),
            }
        }
    }

    pub fn import_backup(&mut self) {
        let confirm = rfd::MessageDialog::new()
            .set_title("Import Backup")
            .set_description("This will replace all current projects. Continue?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        if confirm != rfd::MessageDialogResult::Yes {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Todo Backup", &["json"])
            .pick_file()
        {
            match self.session.import_backup(&path) {
                Ok(count) => self.status_message = format!("Imported {} projects", count),
                Err(e) => self.report(e),
            }
        }
    }

    pub fn export_csv(&mut self) {
        let Some(project) = self.session.current_project() else {
            self.notice = Some(SessionError::NoProjectSelected.to_string());
            return;
        };
        if project.todos().is_empty() {
            self.status_message = "Nothing to export, project has no todos".to_string();
            return;
        }

        let default_name = format!("{}.csv", project.name());
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            match self.session.export_csv(&path) {
                Ok(count) => self.status_message = format!("Exported {} todos to CSV", count),
                Err(e) => self.report(e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match self.session.import_csv(&path) {
                Ok(summary) if summary.skipped > 0 => {
                    self.status_message = format!(
                        "Imported {} todos ({} rows skipped)",
                        summary.imported, summary.skipped
                    );
                }
                Ok(summary) => {
                    self.status_message = format!("Imported {} todos", summary.imported);
                }
                Err(e) => self.report(e),
            }
        }
    }

    pub fn open_data_folder(&mut self) {
        if let Some(dir) = &self.data_dir {
            if let Err(e) = open::that(dir) {
                self.status_message = format!("Could not open {}: {}", dir.display(), e);
            }
        } else {
            self.status_message = "State is kept in memory only".to_string();
        }
    }
}

impl eframe::App for TodoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let dialog_open = self.editor.is_some()
            || self.project_prompt.is_some()
            || self.pending_delete.is_some()
            || self.notice.is_some();
        if !dialog_open {
            let new_todo = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::N));
            let new_project =
                ctx.input(|i| i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::P));
            if new_todo {
                self.open_add_todo();
            }
            if new_project {
                self.open_new_project_prompt();
            }
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::STATUS_BAR_BG)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let manager = self.session.manager();
                        let todos: usize = manager.projects().map(|p| p.todos().len()).sum();
                        ui.label(
                            egui::RichText::new(format!(
                                "Projects: {} · Todos: {}",
                                manager.len(),
                                todos
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: projects
        let mut project_action = ui::project_list::ProjectListAction::None;
        egui::SidePanel::left("project_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(ui::theme::SIDE_PANEL_MIN_WIDTH)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                project_action = ui::project_list::show_project_list(self.session.manager(), ui);
            });

        match project_action {
            ui::project_list::ProjectListAction::Select(id) => self.select_project(id),
            ui::project_list::ProjectListAction::Delete(id) => {
                self.pending_delete = Some(PendingDelete::Project(id));
            }
            ui::project_list::ProjectListAction::Add => self.open_new_project_prompt(),
            ui::project_list::ProjectListAction::None => {}
        }

        // Central panel: todos of the current project
        let mut todo_action = ui::todo_list::TodoListAction::None;
        let list_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::same(12.0));
        egui::CentralPanel::default().frame(list_frame).show(ctx, |ui| {
            todo_action = ui::todo_list::show_todo_list(self.session.current_project(), ui);
        });

        match todo_action {
            ui::todo_list::TodoListAction::Add => self.open_add_todo(),
            ui::todo_list::TodoListAction::Toggle(id) => self.toggle_todo(id),
            ui::todo_list::TodoListAction::Edit(id) => self.open_edit_todo(id),
            ui::todo_list::TodoListAction::Delete(id) => {
                self.pending_delete = Some(PendingDelete::Todo(id));
            }
            ui::todo_list::TodoListAction::None => {}
        }

        // Dialogs
        if self.editor.is_some() {
            ui::todo_editor::show_todo_editor(self, ctx);
        }
        if self.project_prompt.is_some() {
            ui::dialogs::show_project_prompt(self, ctx);
        }
        if self.pending_delete.is_some() {
            ui::dialogs::show_confirm_delete(self, ctx);
        }
        if self.notice.is_some() {
            ui::dialogs::show_notice(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
