// Job postings published on the portal by employers. These are the candidates
// for internal matching.

pub mod handlers;
pub mod validation;
