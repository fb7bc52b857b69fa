pub mod capture;
pub mod pixmap;
pub mod state;
pub mod surface;
