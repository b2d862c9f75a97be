//! Project and todo management core: data model, persistence and the
//! session object the desktop UI drives.

pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod session;

pub use config::Settings;
pub use error::{SessionError, StorageError};
pub use model::{Priority, Project, ProjectManager, Todo};
pub use session::{CsvImportSummary, Session, TodoDraft};
