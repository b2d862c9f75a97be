//! Whole-state persistence under a single storage key.
//!
//! Layout:
//! ```json
//! {
//!   "projects": { "<projectId>": { "name": "...", "todos": [ ... ] } },
//!   "currentProjectId": "<projectId>" | null
//! }
//! ```

use indexmap::IndexMap;
use log::{debug, error, info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::store::KeyValueStore;
use crate::error::StorageResult;
use crate::model::lenient::{self, Lenient};
use crate::model::{Project, ProjectManager, Todo};

/// The single key all state lives under.
pub const STORAGE_KEY: &str = "todoApp";

/// Where the text under [`STORAGE_KEY`] is copied when it cannot be read, so
/// the next save does not destroy it.
pub const UNREADABLE_KEY: &str = "todoApp.unreadable";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedStateRef<'a> {
    projects: IndexMap<Uuid, SavedProjectRef<'a>>,
    current_project_id: Option<Uuid>,
}

#[derive(Serialize)]
struct SavedProjectRef<'a> {
    name: &'a str,
    todos: &'a [Todo],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedState {
    #[serde(default)]
    projects: IndexMap<Uuid, SavedProject>,
    #[serde(default, deserialize_with = "stored_current_id")]
    current_project_id: Option<String>,
}

#[derive(Deserialize)]
struct SavedProject {
    #[serde(default, deserialize_with = "stored_name")]
    name: String,
    #[serde(default, deserialize_with = "stored_todos")]
    todos: Vec<Todo>,
}

fn stored_current_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    lenient::or_else(d, "currentProjectId", || None)
}

fn stored_name<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient::or_else(d, "name", String::new)
}

/// Entries that are not todo objects are dropped; the rest are kept.
fn stored_todos<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Todo>, D::Error> {
    let entries: Vec<Lenient<Todo>> = lenient::or_else(d, "todos", Vec::new)?;
    let total = entries.len();
    let todos: Vec<Todo> = entries.into_iter().filter_map(Lenient::ok).collect();
    if todos.len() < total {
        warn!(
            "event=state_load module=io status=dropped_todos count={}",
            total - todos.len()
        );
    }
    Ok(todos)
}

/// Serialize the manager to the persisted JSON text.
pub fn to_json(manager: &ProjectManager) -> StorageResult<String> {
    let state = SavedStateRef {
        projects: manager
            .projects()
            .map(|p| {
                (
                    p.id(),
                    SavedProjectRef {
                        name: p.name(),
                        todos: p.todos(),
                    },
                )
            })
            .collect(),
        current_project_id: manager.current_id(),
    };
    Ok(serde_json::to_string(&state)?)
}

/// Rebuild a manager from persisted JSON text.
///
/// Each project takes its id from its key. The stored current project is only
/// restored when it names one of the rebuilt projects.
pub fn from_json(text: &str) -> StorageResult<ProjectManager> {
    let state: SavedState = serde_json::from_str(text)?;
    let mut manager = ProjectManager::new();
    for (id, saved) in state.projects {
        manager.add_project(Project::restore(id, saved.name, saved.todos));
    }

    if let Some(raw) = state.current_project_id {
        let restored = Uuid::parse_str(&raw)
            .map(|id| manager.set_current_id(id))
            .unwrap_or(false);
        if !restored {
            warn!("event=state_load module=io status=stale_current current_project_id={raw}");
        }
    }
    Ok(manager)
}

/// Write the manager under [`STORAGE_KEY`].
pub fn save_state<S: KeyValueStore + ?Sized>(
    manager: &ProjectManager,
    store: &mut S,
) -> StorageResult<()> {
    let json = to_json(manager)?;
    store.set(STORAGE_KEY, &json)?;
    debug!(
        "event=state_save module=io status=ok projects={} bytes={}",
        manager.len(),
        json.len()
    );
    Ok(())
}

/// Read the manager from [`STORAGE_KEY`], `None` when nothing is stored.
///
/// # Errors
/// Storage read failures and text that is not a saved state.
pub fn read_state<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<Option<ProjectManager>> {
    let Some(text) = store.get(STORAGE_KEY)? else {
        info!("event=state_load module=io status=empty");
        return Ok(None);
    };
    let manager = from_json(&text)?;
    info!(
        "event=state_load module=io status=ok projects={}",
        manager.len()
    );
    Ok(Some(manager))
}

/// Read the manager from [`STORAGE_KEY`].
///
/// Never fails: missing, unreadable or malformed state is logged and yields an
/// empty manager so the app can still start.
pub fn load_state<S: KeyValueStore + ?Sized>(store: &S) -> ProjectManager {
    match read_state(store) {
        Ok(manager) => manager.unwrap_or_default(),
        Err(err) => {
            error!("event=state_load module=io status=error error={err}");
            ProjectManager::new()
        }
    }
}

/// Copy the text under [`STORAGE_KEY`] to [`UNREADABLE_KEY`]. Returns whether
/// there was anything to copy.
pub fn preserve_unreadable_state<S: KeyValueStore + ?Sized>(store: &mut S) -> StorageResult<bool> {
    let Some(text) = store.get(STORAGE_KEY)? else {
        return Ok(false);
    };
    store.set(UNREADABLE_KEY, &text)?;
    warn!(
        "event=state_preserve module=io status=ok key={UNREADABLE_KEY} bytes={}",
        text.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use crate::model::Priority;

    #[test]
    fn writes_expected_layout() {
        let mut manager = ProjectManager::new();
        let mut project = Project::new("Work");
        project.add_todo(Todo::new("Buy milk", "", None, Some(Priority::High)));
        let id = manager.add_project(project);
        manager.set_current_id(id);

        let json: serde_json::Value = serde_json::from_str(&to_json(&manager).unwrap()).unwrap();

        let key = id.to_string();
        assert_eq!(json["currentProjectId"], key);
        assert_eq!(json["projects"][&key]["name"], "Work");
        assert_eq!(json["projects"][&key]["todos"][0]["title"], "Buy milk");
        assert_eq!(json["projects"][&key]["todos"][0]["priority"], "High");
        assert!(json["projects"][&key].get("id").is_none());
    }

    #[test]
    fn null_current_project_when_nothing_selected() {
        let mut manager = ProjectManager::new();
        manager.add_project(Project::new("Work"));

        let json: serde_json::Value = serde_json::from_str(&to_json(&manager).unwrap()).unwrap();

        assert!(json["currentProjectId"].is_null());
    }

    #[test]
    fn key_overrides_any_other_id() {
        let text = r#"{
            "projects": {
                "11111111-2222-4333-8444-555555555555": { "name": "Home", "todos": [] }
            },
            "currentProjectId": "11111111-2222-4333-8444-555555555555"
        }"#;

        let manager = from_json(text).unwrap();
        let project = manager.current_project().expect("current project restored");

        assert_eq!(
            project.id().to_string(),
            "11111111-2222-4333-8444-555555555555"
        );
        assert_eq!(project.name(), "Home");
    }

    #[test]
    fn stale_current_project_is_not_restored() {
        let text = r#"{
            "projects": {
                "11111111-2222-4333-8444-555555555555": { "name": "Home", "todos": [] }
            },
            "currentProjectId": "99999999-2222-4333-8444-555555555555"
        }"#;

        let manager = from_json(text).unwrap();

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.current_id(), None);
    }

    #[test]
    fn empty_stored_name_falls_back_to_default() {
        let text = r#"{"projects":{"11111111-2222-4333-8444-555555555555":{"name":"","todos":[]}}}"#;
        let manager = from_json(text).unwrap();
        assert_eq!(
            manager.projects().next().map(Project::name),
            Some(crate::model::project::DEFAULT_PROJECT_NAME)
        );
    }

    #[test]
    fn malformed_state_loads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{ not json").unwrap();

        let manager = load_state(&store);

        assert!(manager.is_empty());
        assert_eq!(manager.current_id(), None);
    }

    #[test]
    fn missing_state_loads_as_empty() {
        assert!(load_state(&MemoryStore::new()).is_empty());
        assert!(read_state(&MemoryStore::new()).unwrap().is_none());
    }

    #[test]
    fn one_bad_todo_field_keeps_the_rest_of_the_state() {
        let text = r#"{
            "projects": {
                "11111111-2222-4333-8444-555555555555": {
                    "name": "Work",
                    "todos": [
                        { "title": "x", "dueDate": "" },
                        { "title": "y", "priority": 2 },
                        null,
                        { "title": "z", "dueDate": "2025-06-15T14:30:00Z" }
                    ]
                }
            },
            "currentProjectId": 7
        }"#;

        let manager = from_json(text).unwrap();
        let project = manager.projects().next().expect("project kept");
        let titles: Vec<&str> = project.todos().iter().map(Todo::title).collect();

        assert_eq!(project.name(), "Work");
        assert_eq!(titles, vec!["x", "y", "z"]);
        assert_eq!(project.todos()[1].priority(), Priority::Normal);
        assert_eq!(manager.current_id(), None);
    }

    #[test]
    fn non_string_name_and_non_array_todos_fall_back() {
        let text = r#"{"projects":{"11111111-2222-4333-8444-555555555555":{"name":5,"todos":"none"}}}"#;
        let manager = from_json(text).unwrap();
        let project = manager.projects().next().expect("project kept");

        assert_eq!(project.name(), crate::model::project::DEFAULT_PROJECT_NAME);
        assert!(project.todos().is_empty());
    }

    #[test]
    fn read_state_reports_malformed_text() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{ not json").unwrap();

        assert!(read_state(&store).is_err());
    }

    #[test]
    fn unreadable_text_is_copied_aside() {
        let mut store = MemoryStore::new();
        assert!(!preserve_unreadable_state(&mut store).unwrap());

        store.set(STORAGE_KEY, "{ not json").unwrap();
        assert!(preserve_unreadable_state(&mut store).unwrap());

        assert_eq!(store.get(UNREADABLE_KEY).unwrap().as_deref(), Some("{ not json"));
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("{ not json"));
    }
}
