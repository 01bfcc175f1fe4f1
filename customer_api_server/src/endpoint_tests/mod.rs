mod auth;
mod customers;
mod helpers;
mod lifecycle;
mod mocks;
