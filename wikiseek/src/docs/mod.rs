//! Documentation that spans the whole workspace.

pub mod dev;
pub mod overview;
pub mod testing;
