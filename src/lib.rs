pub mod config;
pub mod error;
pub mod export;
pub mod font;
pub mod glyphs;
pub mod icon;
pub mod layout;
pub mod logger;
pub mod paint;
pub mod palette;
pub mod resize;

pub use error::{IconError, Result};
pub use export::{BatchPolicy, BatchReport, ICON_SIZES};
pub use icon::{IconComposer, Softening};
