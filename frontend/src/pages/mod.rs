pub mod home;
pub mod login;
pub mod parent;
pub mod profile;
pub mod register;
pub mod school;
pub mod teacher;
