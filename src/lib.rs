//! Schemaforge - Database Schema Designer Core
//!
//! The non-visual core of a visual database schema designer: an immutable
//! schema graph model with pure mutation operations, linear undo/redo
//! history, a multi-dialect schema text generator, and a JSON snapshot
//! serializer. Rendering, gestures, and dialogs live in collaborating
//! front-ends that drive [`core::DesignSession`].

pub mod core;
