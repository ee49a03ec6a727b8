pub mod orders;

pub use orders::PaymentService;
