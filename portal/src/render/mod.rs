pub mod achievements;
pub mod directory;
pub mod layout;
pub mod login;
pub mod register;
