//! `prcontext` command-line front end: configuration loading and wiring of
//! the GitHub client and tokenizer into the context service.

pub mod config;
