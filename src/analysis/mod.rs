// Text analysis: readability and keyword density for generated articles.
//
// Everything in here is pure: no I/O, no logging. The workflow stages feed
// assembled article text in and render the numbers into checklists.

pub mod density;
pub mod readability;
pub mod syllables;
pub mod tokens;
