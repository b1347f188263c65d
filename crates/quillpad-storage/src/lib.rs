//! Primary-store abstraction for Quillpad.
//!
//! The cache-aside layer and the HTTP handlers talk to the primary store
//! through the traits defined here. Transaction semantics of a concrete
//! backend are out of scope; callers only depend on a success or failure
//! outcome per operation.

pub mod error;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use traits::{NoteStore, UserStore};
pub use types::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, NewNote, NewUser, Note, NoteUpdate, Page, PageResult, User};
