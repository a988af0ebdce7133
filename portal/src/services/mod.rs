pub mod draft_sweeper;

pub use draft_sweeper::DraftSweeper;
