pub mod attendance;
pub mod crud;
pub mod extract;
