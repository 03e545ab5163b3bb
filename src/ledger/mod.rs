pub mod assignment;
pub mod finance;
pub mod inventory;
pub mod registry;
pub mod settlement;

pub const AVAILABLE: &str = "available";
pub const OCCUPIED: &str = "occupied";
pub const MAINTENANCE: &str = "maintenance";

pub const ACTIVE: &str = "active";
pub const ARCHIVED: &str = "archived";
pub const ENDED: &str = "ended";

pub const CONFIRMED: &str = "confirmed";
