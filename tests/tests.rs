//! Integration tests calling the HTTP handlers directly with an in-memory database
//! and a memory session store.

mod controller;
mod util;
