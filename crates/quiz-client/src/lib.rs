//! Client runtime for the generated study site: an explicit state machine over
//! the embedded question list, the persisted flag store, and the view renderer.

pub mod render;
pub mod state;
pub mod store;

pub use state::{Action, ClientState, Filter, Render};
pub use store::{FlagStore, KeyValueStore, MemoryStore};
