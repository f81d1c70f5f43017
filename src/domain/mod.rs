pub mod release;
pub mod title;
pub mod trailer;

pub use release::{Quality, Release};
pub use title::{TitleDetails, TitleSummary};
pub use trailer::{select_trailer, TrailerCandidate};
