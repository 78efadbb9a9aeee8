pub mod location;
pub mod notification;
pub mod recommendation;
pub mod trip;
