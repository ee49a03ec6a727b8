pub mod account;

pub use account::PatientAccountService;
