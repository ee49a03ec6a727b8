pub mod lifecycle;

pub use lifecycle::AppointmentService;
