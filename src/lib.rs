// Blogflow: staged blog workflow artifacts and README feed refresh
//
// This is the library root. Each module corresponds to a major subsystem:
// text analysis, keyword cluster scoring, the stage generators, and the
// RSS/Atom feed pipeline that keeps the README post list current.

pub mod analysis;
pub mod clusters;
pub mod config;
pub mod feeds;
pub mod output;
pub mod pipeline;
pub mod workflow;
