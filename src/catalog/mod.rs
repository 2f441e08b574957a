//! Static catalogs of terrain and unit kinds

pub mod terrain;
pub mod unit;

pub use terrain::{Terrain, IMPASSABLE};
pub use unit::{Domain, UnitKind, UnitStats};
