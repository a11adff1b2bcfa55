//! # dockhand
//!
//! Command-line front-end for the Docker Engine network API.
//!
//! ```text
//! dockhand network create backend --subnet 10.10.0.0/24
//! dockhand network connect backend web --alias api
//! dockhand network ls --filter driver=bridge
//! ```

#![warn(missing_docs)]

pub mod cli;
