mod accounts;
mod events;
mod mount;
mod submit;
mod utils;
