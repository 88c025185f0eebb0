pub mod action;
pub mod failure;
pub mod service;
