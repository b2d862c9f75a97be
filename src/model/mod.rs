pub(crate) mod lenient;
pub mod manager;
pub mod project;
pub mod todo;

pub use manager::ProjectManager;
pub use project::Project;
pub use todo::{Priority, Todo};
