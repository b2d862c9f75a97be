use std::path::Path;

use super::state;
use crate::error::{StorageError, StorageResult};
use crate::model::ProjectManager;

/// Save all projects to a standalone JSON backup file.
pub fn save_backup(manager: &ProjectManager, path: &Path) -> StorageResult<()> {
    let json = state::to_json(manager)?;
    std::fs::write(path, json).map_err(|e| StorageError::io(path, e))
}

/// Load all projects from a JSON backup file. Unlike startup loading, a
/// malformed file is an error here.
pub fn load_backup(path: &Path) -> StorageResult<ProjectManager> {
    let json = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
    state::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Todo};

    #[test]
    fn backup_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        let mut manager = ProjectManager::new();
        let mut project = Project::new("Work");
        project.add_todo(Todo::new("a", "b", None, None));
        let id = manager.add_project(project);
        manager.set_current_id(id);

        save_backup(&manager, &path).unwrap();

        assert_eq!(load_backup(&path).unwrap(), manager);
    }

    #[test]
    fn malformed_backup_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(matches!(load_backup(&path), Err(StorageError::Json(_))));
    }

    #[test]
    fn missing_backup_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        match load_backup(&path) {
            Err(StorageError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected I/O error, got {other:?}"),
        }
    }
}
