//! Storage layer - database entities, repositories and stored functions

pub mod entity;
pub mod mapper;
pub mod repositories;
pub mod rpc;
