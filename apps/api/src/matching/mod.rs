// Job matching: keyword derivation from a resume, the overlap scorer, and the
// two match paths (external provider listings and stored portal postings).

pub mod external;
pub mod handlers;
pub mod internal;
pub mod keywords;
pub mod scorer;
