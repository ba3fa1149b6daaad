//! Strategy implementations, one per upstream shape

pub mod family;
pub mod git_tags;
pub mod listing;
pub mod phrase;
pub mod tag_api;

pub use family::FamilyStrategy;
pub use git_tags::GitTagsStrategy;
pub use listing::ListingStrategy;
pub use phrase::PhraseStrategy;
pub use tag_api::TagApiStrategy;
