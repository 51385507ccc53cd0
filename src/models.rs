pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod outlet;
pub mod rbac;
pub mod tenancy;
