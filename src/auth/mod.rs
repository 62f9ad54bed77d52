pub mod authorization;
pub mod gotrue;
pub mod jwks;
pub mod jwt;
pub mod middleware;
