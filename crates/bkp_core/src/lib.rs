pub mod actions;
pub mod backend;
pub mod modes;
pub mod navigation;
pub mod overview;
pub mod pattern;
pub mod poller;
pub mod render;
pub mod rows;
pub mod schedules;
pub mod settings;
pub mod topic;
