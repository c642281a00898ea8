// Library root: domain data model, configuration, odds math, and data
// loading shared by the model and the command-line front end.

pub mod config;
pub mod data;
pub mod feed;
pub mod game;
pub mod odds;
pub mod team;
