use uuid::Uuid;

use super::todo::Todo;

/// Name used when a project is created without one.
pub const DEFAULT_PROJECT_NAME: &str = "Default Project";

/// A named, ordered list of todos. Order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: Uuid,
    name: String,
    todos: Vec<Todo>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: DEFAULT_PROJECT_NAME.to_string(),
            todos: Vec::new(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let mut project = Self::default();
        project.set_name(name);
        project
    }

    /// Rebuild a project from stored parts, keeping the stored id.
    pub fn restore(id: Uuid, name: impl Into<String>, todos: Vec<Todo>) -> Self {
        let mut project = Self {
            id,
            todos,
            ..Default::default()
        };
        project.set_name(name);
        project
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename; an empty name falls back to "Default Project".
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() {
            DEFAULT_PROJECT_NAME.to_string()
        } else {
            name
        };
    }

    /// Append to the end of the list. Ids are not checked for duplicates.
    pub fn add_todo(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    /// Remove the todo with `id`. Unknown ids leave the list untouched.
    pub fn remove_todo(&mut self, id: Uuid) -> Option<Todo> {
        let pos = self.todos.iter().position(|t| t.id() == id)?;
        Some(self.todos.remove(pos))
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn todo(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id() == id)
    }

    pub fn todo_mut(&mut self, id: Uuid) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id() == id)
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }
}
