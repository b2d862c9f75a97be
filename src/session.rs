//! Application state tying the project registry to storage.
//!
//! Every mutating operation saves the whole state before returning. If that
//! save fails the change is rolled back, so memory and storage agree. Operations
//! on ids that no longer exist change nothing and report that through their
//! return value rather than an error.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::io::{self, KeyValueStore};
use crate::model::{Priority, Project, ProjectManager, Todo};

/// Todo fields as entered in the editor dialog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    /// `None` means "now".
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl TodoDraft {
    pub fn into_todo(self) -> Todo {
        Todo::new(self.title, self.description, self.due_date, Some(self.priority))
    }

    fn apply_to(self, todo: &mut Todo) {
        todo.set_title(self.title);
        todo.set_description(self.description);
        todo.set_due_date(self.due_date.unwrap_or_else(Utc::now));
        todo.set_priority(self.priority);
    }
}

impl From<&Todo> for TodoDraft {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title().to_string(),
            description: todo.description().to_string(),
            due_date: Some(todo.due_date()),
            priority: todo.priority(),
        }
    }
}

/// Result of a CSV import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImportSummary {
    pub project_id: Uuid,
    pub imported: usize,
    pub skipped: usize,
}

pub struct Session {
    manager: ProjectManager,
    store: Box<dyn KeyValueStore>,
}

impl Session {
    /// Load saved state from `store`. When nothing is stored, start with a
    /// selected "My Tasks" project.
    ///
    /// Stored text that cannot be read is copied to [`io::UNREADABLE_KEY`] and
    /// left in place; the session starts empty and nothing is written over it
    /// until the first change.
    pub fn open(mut store: impl KeyValueStore + 'static) -> Self {
        let (manager, readable) = match io::read_state(&store) {
            Ok(manager) => (manager.unwrap_or_default(), true),
            Err(err) => {
                error!("event=session_open module=session status=unreadable_state error={err}");
                if let Err(err) = io::preserve_unreadable_state(&mut store) {
                    warn!("event=session_open module=session status=preserve_failed error={err}");
                }
                (ProjectManager::new(), false)
            }
        };
        let mut session = Self {
            manager,
            store: Box::new(store),
        };
        if session.manager.ensure_default_project().is_some() {
            info!("event=session_open module=session status=created_default_project");
            if readable {
                if let Err(err) = session.save() {
                    warn!("event=session_open module=session status=save_failed error={err}");
                }
            }
        }
        session
    }

    pub fn manager(&self) -> &ProjectManager {
        &self.manager
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.manager.current_project()
    }

    /// Persist the whole state.
    pub fn save(&mut self) -> SessionResult<()> {
        io::save_state(&self.manager, &mut self.store)?;
        Ok(())
    }

    /// Apply `change` and save. `None` from `change` means nothing happened and
    /// nothing is saved. A failed save restores the state from before.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut ProjectManager) -> Option<T>,
    ) -> SessionResult<Option<T>> {
        let before = self.manager.clone();
        let Some(out) = change(&mut self.manager) else {
            return Ok(None);
        };
        if let Err(err) = self.save() {
            warn!("event=state_save module=session status=rolled_back error={err}");
            self.manager = before;
            return Err(err);
        }
        Ok(Some(out))
    }

    // --- Projects ---

    /// Create a project and select it. Blank names are rejected with `None`.
    pub fn create_project(&mut self, name: &str) -> SessionResult<Option<Uuid>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let id = self.commit(|manager| {
            let id = manager.add_project(Project::new(name));
            manager.set_current_id(id);
            Some(id)
        })?;
        if let Some(id) = id {
            info!("event=project_create module=session status=ok project_id={id}");
        }
        Ok(id)
    }

    pub fn rename_project(&mut self, id: Uuid, name: &str) -> SessionResult<bool> {
        let renamed = self.commit(|manager| {
            manager.project_mut(id).map(|project| project.set_name(name.trim()))
        })?;
        Ok(renamed.is_some())
    }

    pub fn select_project(&mut self, id: Uuid) -> SessionResult<bool> {
        let selected = self.commit(|manager| manager.set_current_id(id).then_some(()))?;
        Ok(selected.is_some())
    }

    /// Delete a project and its todos. If it was selected, the selection
    /// moves to another project or is cleared.
    pub fn delete_project(&mut self, id: Uuid) -> SessionResult<Option<Project>> {
        let removed = self.commit(|manager| manager.remove_project(id))?;
        if let Some(project) = &removed {
            info!(
                "event=project_delete module=session status=ok project_id={id} todos={}",
                project.todos().len()
            );
        }
        Ok(removed)
    }

    // --- Todos in the current project ---

    /// Add a todo to the current project.
    ///
    /// # Errors
    /// [`SessionError::NoProjectSelected`] when no project is selected.
    pub fn add_todo(&mut self, draft: TodoDraft) -> SessionResult<Uuid> {
        let todo = draft.into_todo();
        let id = todo.id();
        self.commit(|manager| manager.current_project_mut().map(|p| p.add_todo(todo)))?
            .ok_or(SessionError::NoProjectSelected)?;
        debug!("event=todo_add module=session status=ok todo_id={id}");
        Ok(id)
    }

    pub fn update_todo(&mut self, id: Uuid, draft: TodoDraft) -> SessionResult<bool> {
        let updated =
            self.commit(|manager| current_todo_mut(manager, id).map(|todo| draft.apply_to(todo)))?;
        Ok(updated.is_some())
    }

    /// Flip completion. Returns the new state, or `None` for unknown ids.
    pub fn toggle_todo(&mut self, id: Uuid) -> SessionResult<Option<bool>> {
        self.commit(|manager| {
            current_todo_mut(manager, id).map(|todo| {
                todo.toggle_completed();
                todo.completed
            })
        })
    }

    pub fn delete_todo(&mut self, id: Uuid) -> SessionResult<Option<Todo>> {
        self.commit(|manager| manager.current_project_mut()?.remove_todo(id))
    }

    // --- Files ---

    pub fn export_backup(&self, path: &Path) -> SessionResult<usize> {
        io::save_backup(&self.manager, path)?;
        Ok(self.manager.len())
    }

    /// Replace all state with a backup file's contents.
    pub fn import_backup(&mut self, path: &Path) -> SessionResult<usize> {
        let mut loaded = io::load_backup(path)?;
        loaded.ensure_default_project();
        self.commit(|manager| {
            *manager = loaded;
            Some(())
        })?;
        info!(
            "event=backup_import module=session status=ok projects={}",
            self.manager.len()
        );
        Ok(self.manager.len())
    }

    /// Export the current project's todos.
    pub fn export_csv(&self, path: &Path) -> SessionResult<usize> {
        let project = self
            .manager
            .current_project()
            .ok_or(SessionError::NoProjectSelected)?;
        io::csv_export::export_csv(project.todos(), path).map_err(SessionError::Csv)
    }

    /// Append todos from a CSV file to the current project, or to a new
    /// project named after the file when nothing is selected.
    pub fn import_csv(&mut self, path: &Path) -> SessionResult<CsvImportSummary> {
        let (todos, skipped) = io::csv_import::import_csv(path).map_err(SessionError::Csv)?;
        let imported = todos.len();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Imported Project");

        let project_id = self
            .commit(|manager| {
                let id = match manager.current_id() {
                    Some(id) => id,
                    None => {
                        let id = manager.add_project(Project::new(name));
                        manager.set_current_id(id);
                        id
                    }
                };
                let project = manager.project_mut(id)?;
                for todo in todos {
                    project.add_todo(todo);
                }
                Some(id)
            })?
            .ok_or(SessionError::NoProjectSelected)?;
        Ok(CsvImportSummary {
            project_id,
            imported,
            skipped,
        })
    }
}

fn current_todo_mut(manager: &mut ProjectManager, id: Uuid) -> Option<&mut Todo> {
    manager.current_project_mut()?.todo_mut(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;

    fn draft(title: &str, priority: Priority) -> TodoDraft {
        TodoDraft {
            title: title.to_string(),
            priority,
            ..TodoDraft::default()
        }
    }

    #[test]
    fn open_on_empty_store_creates_selected_default_project() {
        let session = Session::open(MemoryStore::new());

        let current = session.current_project().expect("default project selected");
        assert_eq!(current.name(), crate::model::manager::FIRST_PROJECT_NAME);
        assert_eq!(session.manager().len(), 1);
    }

    #[test]
    fn blank_project_name_is_rejected() {
        let mut session = Session::open(MemoryStore::new());
        assert_eq!(session.create_project("   ").unwrap(), None);
        assert_eq!(session.manager().len(), 1);
    }

    #[test]
    fn create_project_selects_it() {
        let mut session = Session::open(MemoryStore::new());
        let id = session.create_project("  Work ").unwrap().unwrap();

        assert_eq!(session.manager().current_id(), Some(id));
        assert_eq!(session.current_project().map(Project::name), Some("Work"));
    }

    #[test]
    fn add_todo_without_selection_is_rejected() {
        let mut session = Session::open(MemoryStore::new());
        let id = session.manager().current_id().unwrap();
        session.delete_project(id).unwrap();

        let err = session.add_todo(draft("x", Priority::Low)).unwrap_err();

        assert!(matches!(err, SessionError::NoProjectSelected));
        assert_eq!(err.to_string(), "Please select a project first!");
    }

    #[test]
    fn todo_lifecycle_in_current_project() {
        let mut session = Session::open(MemoryStore::new());
        let id = session.add_todo(draft("Buy milk", Priority::High)).unwrap();

        assert_eq!(session.toggle_todo(id).unwrap(), Some(true));
        assert!(session
            .update_todo(id, draft("Buy oat milk", Priority::Low))
            .unwrap());

        let todo = session.current_project().unwrap().todo(id).unwrap();
        assert_eq!(todo.title(), "Buy oat milk");
        assert_eq!(todo.priority(), Priority::Low);
        assert!(todo.completed);

        assert!(session.delete_todo(id).unwrap().is_some());
        assert!(session.current_project().unwrap().todos().is_empty());
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let mut session = Session::open(MemoryStore::new());
        let before = session.manager().clone();
        let ghost = Uuid::new_v4();

        assert_eq!(session.toggle_todo(ghost).unwrap(), None);
        assert!(!session.update_todo(ghost, TodoDraft::default()).unwrap());
        assert!(session.delete_todo(ghost).unwrap().is_none());
        assert!(session.delete_project(ghost).unwrap().is_none());
        assert!(!session.select_project(ghost).unwrap());
        assert!(!session.rename_project(ghost, "x").unwrap());
        assert_eq!(session.manager(), &before);
    }

    /// Serves fixed text and rejects every write.
    struct ReadOnlyStore {
        text: Option<String>,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> crate::error::StorageResult<Option<String>> {
            Ok(self.text.clone())
        }

        fn set(&mut self, _key: &str, _value: &str) -> crate::error::StorageResult<()> {
            Err(crate::error::StorageError::NoDataDir)
        }
    }

    fn read_only_session_with_todo() -> (Session, Uuid) {
        let mut manager = ProjectManager::new();
        let mut project = Project::new("Work");
        let todo = Todo::new("Buy milk", "", None, Some(Priority::High));
        let todo_id = todo.id();
        project.add_todo(todo);
        let project_id = manager.add_project(project);
        manager.set_current_id(project_id);
        let text = io::state::to_json(&manager).unwrap();

        (Session::open(ReadOnlyStore { text: Some(text) }), todo_id)
    }

    #[test]
    fn failed_save_rolls_back_todo_changes() {
        let (mut session, todo_id) = read_only_session_with_todo();
        let before = session.manager().clone();

        assert!(session.add_todo(draft("Walk dog", Priority::Low)).is_err());
        assert!(session.toggle_todo(todo_id).is_err());
        assert!(session
            .update_todo(todo_id, draft("Buy oat milk", Priority::Low))
            .is_err());
        assert!(session.delete_todo(todo_id).is_err());

        assert_eq!(session.manager(), &before);
        let todo = session.current_project().unwrap().todo(todo_id).unwrap();
        assert_eq!(todo.title(), "Buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn failed_save_rolls_back_project_changes() {
        let (mut session, _) = read_only_session_with_todo();
        let before = session.manager().clone();
        let current = before.current_id().unwrap();

        assert!(session.create_project("Home").is_err());
        assert!(session.rename_project(current, "Renamed").is_err());
        assert!(session.delete_project(current).is_err());

        assert_eq!(session.manager(), &before);
    }

    #[test]
    fn noop_changes_do_not_touch_storage() {
        let (mut session, _) = read_only_session_with_todo();

        assert_eq!(session.toggle_todo(Uuid::new_v4()).unwrap(), None);
        assert!(!session.select_project(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn unreadable_state_is_not_overwritten_on_open() {
        let mut store = MemoryStore::new();
        store.set(io::STORAGE_KEY, "{ not json").unwrap();

        let session = Session::open(store);

        assert_eq!(
            session.current_project().map(Project::name),
            Some(crate::model::manager::FIRST_PROJECT_NAME)
        );
        let stored = session.store.get(io::STORAGE_KEY).unwrap();
        let copied = session.store.get(io::UNREADABLE_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some("{ not json"));
        assert_eq!(copied.as_deref(), Some("{ not json"));
    }

    #[test]
    fn draft_round_trips_through_todo() {
        let todo = Todo::new("t", "d", None, Some(Priority::High));
        let draft = TodoDraft::from(&todo);
        assert_eq!(draft.title, "t");
        assert_eq!(draft.due_date, Some(todo.due_date()));
        assert_eq!(draft.priority, Priority::High);
    }
}
