pub mod index;
pub mod load;
pub mod lookup;
pub mod normalize;
pub mod validate;

pub use index::{DocAnchor, DocId, DocRef, ObjectEntry, ObjectName, Postings, SearchIndex};
