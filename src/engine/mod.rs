pub mod dispatcher;
pub mod recommend;
pub mod scoring;
pub mod simulator;
