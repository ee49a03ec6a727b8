pub mod account;
pub mod directory;

pub use account::DoctorAccountService;
pub use directory::DoctorDirectoryService;
