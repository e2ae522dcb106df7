//! Interactive core of the heritage media browser: catalog filtering,
//! single-item selection, simulated playback and the hero carousel.

pub mod carousel;
pub mod catalog;
pub mod config;
pub mod platform;
pub mod playback;
pub mod selection;
pub mod session;
pub mod store;
pub mod timer;

pub use carousel::{CarouselScheduler, CarouselState};
pub use catalog::{
    Catalog, CatalogError, CatalogItem, Category, CategoryFilter, ItemId, ItemKind, Slide,
};
pub use config::Config;
pub use playback::{
    BackendProgress, MediaIntent, PlaybackSimulator, PlaybackState, PlaybackStatus,
    ProgressSource, SyntheticProgress,
};
pub use selection::{SelectionController, SelectionEvent, View};
pub use session::{Session, SessionSnapshot};
pub use store::{CatalogStore, FilterOutcome, FilterState};
pub use timer::{ManualScheduler, Scheduler, TimerHandle, TimerTag, TokioScheduler};
