/*
Terminal session that types out the verse of the day.

Flow:
    key press ──> Session::handle_key ──> dispatcher ──> Effect::Fetch ──> VerseSource
                                             │                               │
                                             v                               v
                                          Animator <── Session::complete_fetch
                                             │
                                       Session::tick ──> OutputLog ──> render

The session is a plain state machine (Idle / Animating / Loading) that never does
I/O and never reads the clock itself; app.rs owns the terminal, the clock and the
fetch tasks and feeds their results back in.
*/
pub mod animation;
pub mod app;
mod clock;
pub mod command;
pub mod config;
pub mod input;
pub mod output;
pub mod render;
mod sanitize;
mod script;
pub mod source;
pub mod state;

pub use state::{Effect, Phase, Session};
