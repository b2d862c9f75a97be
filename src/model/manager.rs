use indexmap::IndexMap;
use uuid::Uuid;

use super::project::Project;

/// Project created when the manager would otherwise be empty.
pub const FIRST_PROJECT_NAME: &str = "My Tasks";

/// Registry of all projects plus the currently selected one.
///
/// # Invariants
/// - Project ids are unique (they are the map keys).
/// - `current_id`, when set, names a project in the map. Selecting an unknown
///   id is ignored and removing the current project moves the selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectManager {
    projects: IndexMap<Uuid, Project>,
    current_id: Option<Uuid>,
}

impl ProjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keyed by the project's own id. Returns that id.
    pub fn add_project(&mut self, project: Project) -> Uuid {
        let id = project.id();
        self.projects.insert(id, project);
        id
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.get_mut(&id)
    }

    /// All projects in insertion order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> + '_ {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Remove a project. Unknown ids leave the manager untouched.
    ///
    /// If the removed project was selected, the selection moves to the first
    /// remaining project, or is cleared when none remain.
    pub fn remove_project(&mut self, id: Uuid) -> Option<Project> {
        let removed = self.projects.shift_remove(&id)?;
        if self.current_id == Some(id) {
            self.current_id = self.projects.keys().next().copied();
        }
        Some(removed)
    }

    /// Select a project. Returns `false` (and changes nothing) for unknown ids.
    pub fn set_current_id(&mut self, id: Uuid) -> bool {
        if self.projects.contains_key(&id) {
            self.current_id = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_current(&mut self) {
        self.current_id = None;
    }

    pub fn current_id(&self) -> Option<Uuid> {
        self.current_id
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current_id.and_then(|id| self.projects.get(&id))
    }

    pub fn current_project_mut(&mut self) -> Option<&mut Project> {
        let id = self.current_id?;
        self.projects.get_mut(&id)
    }

    /// Create and select "My Tasks" when there are no projects at all.
    /// Returns the new project's id if one was created.
    pub fn ensure_default_project(&mut self) -> Option<Uuid> {
        if !self.projects.is_empty() {
            return None;
        }
        let id = self.add_project(Project::new(FIRST_PROJECT_NAME));
        self.current_id = Some(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut manager = ProjectManager::new();
        let id = manager.add_project(Project::new("Work"));

        assert_eq!(manager.project(id).map(Project::name), Some("Work"));
        assert_eq!(manager.len(), 1);
        assert!(manager.project(Uuid::new_v4()).is_none());
    }

    #[test]
    fn projects_iterate_in_insertion_order() {
        let mut manager = ProjectManager::new();
        let names = ["c", "a", "b"];
        for name in names {
            manager.add_project(Project::new(name));
        }
        let listed: Vec<&str> = manager.projects().map(Project::name).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn remove_unknown_project_is_noop() {
        let mut manager = ProjectManager::new();
        let id = manager.add_project(Project::new("Work"));
        manager.set_current_id(id);
        let before = manager.clone();

        assert!(manager.remove_project(Uuid::new_v4()).is_none());
        assert_eq!(manager, before);
    }

    #[test]
    fn removing_only_current_project_clears_selection() {
        let mut manager = ProjectManager::new();
        let id = manager.add_project(Project::new("Work"));
        manager.set_current_id(id);

        manager.remove_project(id);

        assert!(manager.current_project().is_none());
        assert_eq!(manager.current_id(), None);
    }

    #[test]
    fn removing_current_project_selects_first_remaining() {
        let mut manager = ProjectManager::new();
        let work = manager.add_project(Project::new("Work"));
        let home = manager.add_project(Project::new("Home"));
        let misc = manager.add_project(Project::new("Misc"));
        manager.set_current_id(home);

        manager.remove_project(home);
        assert_eq!(manager.current_id(), Some(work));

        manager.remove_project(work);
        assert_eq!(manager.current_id(), Some(misc));
    }

    #[test]
    fn removing_other_project_keeps_selection() {
        let mut manager = ProjectManager::new();
        let work = manager.add_project(Project::new("Work"));
        let home = manager.add_project(Project::new("Home"));
        manager.set_current_id(work);

        manager.remove_project(home);

        assert_eq!(manager.current_id(), Some(work));
    }

    #[test]
    fn selecting_unknown_id_is_ignored() {
        let mut manager = ProjectManager::new();
        let id = manager.add_project(Project::new("Work"));
        assert!(manager.set_current_id(id));

        assert!(!manager.set_current_id(Uuid::new_v4()));
        assert_eq!(manager.current_id(), Some(id));

        manager.clear_current();
        assert!(manager.current_project().is_none());
    }

    #[test]
    fn ensure_default_project_only_when_empty() {
        let mut manager = ProjectManager::new();
        let id = manager.ensure_default_project().expect("created on empty manager");

        assert_eq!(manager.current_project().map(Project::name), Some(FIRST_PROJECT_NAME));
        assert_eq!(manager.current_id(), Some(id));
        assert!(manager.ensure_default_project().is_none());
        assert_eq!(manager.len(), 1);
    }
}
