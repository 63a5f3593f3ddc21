//! Entity types for the savings domain.

pub mod category;
pub mod jar;
pub mod note;
pub mod record;

pub use category::Category;
pub use jar::{Jar, JarPurpose, JarStyle};
pub use note::{Note, NoteColor};
pub use record::{RecordKind, TransactionRecord};
