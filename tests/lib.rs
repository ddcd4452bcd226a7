//! Workspace member holding end-to-end gateway tests.
