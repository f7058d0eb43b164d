pub mod event;
pub mod generator;
pub mod timeline;

pub use event::{InstrumentClass, NoteEvent};
pub use generator::{generate, TimelineBuilder};
pub use timeline::{Genre, Timeline};
