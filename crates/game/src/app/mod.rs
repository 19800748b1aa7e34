mod bootstrap;
mod config;
mod explorer;
mod loop_runner;

pub(crate) use loop_runner::run;
