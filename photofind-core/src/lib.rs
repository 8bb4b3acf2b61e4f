pub mod client;
pub mod conf;
pub mod error;
pub mod model;
pub mod session;
pub mod state;

pub use crate::client::{PhotoApi, UnsplashClient, IMAGES_PER_PAGE};
pub use crate::conf::Conf;
pub use crate::error::{FetchError, FetchFlow};
pub use crate::model::{Image, ImageLinks, ImageUrls, Photographer, SearchPage};
pub use crate::session::{execute, FetchKind, FetchOutcome, FetchRequest, SearchSession};
pub use crate::state::{Event, SearchState};
