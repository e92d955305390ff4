//! Gateways to external collaborators.
//!
//! Everything that talks to the identity provider over the network lives here.
pub mod oidc;
