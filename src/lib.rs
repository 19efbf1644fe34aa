//! A Flappy Bird clone on a fixed 288x512 playfield.
//!
//! The game logic ([`game::GameState`], [`bird::Bird`], [`pipe::Pipe`]) is
//! independent of the terminal; [`render`] draws it onto a half-block pixel
//! buffer and the binary drives both at a fixed frame rate.

pub mod bird;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod logging;
pub mod pipe;
pub mod render;
