pub mod blank_scanner;

pub use blank_scanner::{BlankScanner, ScanSettings};
