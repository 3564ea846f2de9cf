mod admin;
mod auth;
mod company;
mod provider;
mod public;
mod router;
