/// UI widgets for PathWalker.

pub mod status_bar;
